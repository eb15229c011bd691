use hotchocolate_types::error::codes;
use hotchocolate_types::types::scalars::{DateTimeType, IntType, LongType, ScalarType};
use hotchocolate_types::types::{ObjectFieldDefinition, ObjectTypeDefinition};
use hotchocolate_types::{RuntimeType, RuntimeValue, ScalarError, SchemaBuilder, ValueNode};

#[test]
fn test_runtime_types_bind_builtin_scalars() {
    let schema = SchemaBuilder::new()
        .add_type(
            ObjectTypeDefinition::new("Query")
                .field(ObjectFieldDefinition::new("count").result_type(RuntimeType::long()))
                .field(
                    ObjectFieldDefinition::new("maybe").result_type(RuntimeType::int().nullable()),
                )
                .field(ObjectFieldDefinition::new("at").result_type(RuntimeType::date_time())),
        )
        .build()
        .expect("valid schema");

    let query = schema.query_type().expect("query type");
    assert_eq!(query.fields["count"].ty.to_string(), "Long!");
    assert_eq!(query.fields["maybe"].ty.to_string(), "Int");
    assert_eq!(query.fields["at"].ty.to_string(), "DateTime!");

    let long = schema
        .get_type("Long")
        .and_then(|t| t.as_scalar())
        .expect("Long scalar registered on demand");
    assert_eq!(long.parse_literal(&ValueNode::int(5_000_000_000_i64)), Ok(RuntimeValue::Long(5_000_000_000)));
    assert!(schema.print().contains("scalar Long"));
}

#[test]
fn test_coercion_is_strict() {
    assert!(IntType.parse_literal(&ValueNode::int(2_147_483_648_i64)).is_err());
    assert!(matches!(
        IntType.serialize(&RuntimeValue::Long(1)),
        Err(ScalarError::InvalidValue { .. })
    ));
    assert!(LongType.parse_literal(&ValueNode::Float("1.0".into())).is_err());
    assert_eq!(IntType.is_instance_of_type(Some(&ValueNode::string("1"))), Ok(false));
}

#[test]
fn test_date_time_offset_is_explicit() {
    let value = DateTimeType
        .parse_literal(&ValueNode::string("2018-06-11T08:46:14Z"))
        .expect("RFC 3339 literal");
    assert_eq!(
        DateTimeType.serialize(&value),
        Ok(RuntimeValue::String("2018-06-11T08:46:14+00:00".into()))
    );
}

#[test]
fn test_default_values_use_scalar_coercion() {
    SchemaBuilder::new()
        .add_document(
            r#"
            scalar DateTime
            type Query { events(after: DateTime = "2018-06-11T08:46:14+04:00"): String }
            "#,
        )
        .build()
        .expect("valid default");

    let err = SchemaBuilder::new()
        .add_document(
            r#"
            scalar DateTime
            type Query { events(after: DateTime = "yesterday"): String }
            "#,
        )
        .build()
        .expect_err("invalid default");
    assert!(err.has_code(codes::INVALID_DEFAULT_VALUE));
}
