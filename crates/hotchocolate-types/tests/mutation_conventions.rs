use hotchocolate_types::error::codes;
use hotchocolate_types::mutations::middleware::{
    MUTATION_ARGUMENTS_MIDDLEWARE, MUTATION_ERRORS_MIDDLEWARE, MUTATION_RESULT_MIDDLEWARE,
    PAYLOAD_NULL_ON_ERROR_MIDDLEWARE,
};
use hotchocolate_types::resolvers::ArgumentValue;
use hotchocolate_types::schema::NamedType;
use hotchocolate_types::types::{ArgumentDefinition, ObjectFieldDefinition, ObjectTypeDefinition};
use hotchocolate_types::{
    FieldError, MiddlewareContext, MutationContextData, MutationConventionOptions, ObjectValue,
    ResolverResult, RuntimeType, RuntimeValue, SchemaBuilder, ValueNode,
};

fn query() -> ObjectTypeDefinition {
    ObjectTypeDefinition::new("Query")
        .field(ObjectFieldDefinition::new("hello").type_syntax("String"))
}

fn user() -> ObjectTypeDefinition {
    ObjectTypeDefinition::new("User")
        .runtime_type(RuntimeType::reference("User"))
        .field(ObjectFieldDefinition::new("name").type_syntax("String!"))
}

fn create_user() -> ObjectFieldDefinition {
    ObjectFieldDefinition::new("createUser")
        .result_type(RuntimeType::reference("User"))
        .argument(ArgumentDefinition::runtime("name", RuntimeType::string()))
        .resolve_with(|context| {
            let name = context.argument("name").cloned().unwrap_or_default();
            Ok(ResolverResult::Value(
                ObjectValue::typed("User").with_field("name", name).into(),
            ))
        })
}

#[test]
fn test_create_user_is_rewritten() {
    let schema = SchemaBuilder::new()
        .add_type(query())
        .add_type(user())
        .add_type(ObjectTypeDefinition::new("Mutation").field(create_user()))
        .add_mutation_conventions(MutationConventionOptions::default())
        .build()
        .expect("valid schema");

    let field = schema
        .mutation_type()
        .and_then(|mutation| mutation.field("createUser"))
        .expect("createUser field");
    assert_eq!(field.arguments.keys().collect::<Vec<_>>(), vec!["input"]);
    assert_eq!(field.arguments["input"].ty.to_string(), "CreateUserInput!");
    assert_eq!(field.ty.to_string(), "CreateUserPayload!");
    assert_eq!(
        field.middleware_keys,
        vec![MUTATION_ARGUMENTS_MIDDLEWARE, MUTATION_RESULT_MIDDLEWARE]
    );

    let input = schema
        .get_type("CreateUserInput")
        .and_then(NamedType::as_input_object)
        .expect("input type");
    assert_eq!(input.field("name").map(|f| f.ty.to_string()).as_deref(), Some("String"));

    let payload = schema.object_type("CreateUserPayload").expect("payload type");
    assert_eq!(payload.fields.keys().collect::<Vec<_>>(), vec!["user"]);
    assert_eq!(payload.fields["user"].ty.to_string(), "User");
    assert!(schema.get_type("CreateUserError").is_none());
    assert!(schema.get_type("Error").is_none());
}

#[test]
fn test_rewritten_mutation_resolves_flat_arguments() {
    let schema = SchemaBuilder::new()
        .add_type(query())
        .add_type(user())
        .add_type(ObjectTypeDefinition::new("Mutation").field(create_user()))
        .add_mutation_conventions(MutationConventionOptions::default())
        .build()
        .expect("valid schema");

    let field = schema
        .mutation_type()
        .and_then(|mutation| mutation.field("createUser"))
        .expect("createUser field");
    let mut context = MiddlewareContext::new("Mutation", "createUser").with_argument(
        ArgumentValue::new("input", ObjectValue::new().with_field("name", "Ada")),
    );
    let result = field.resolve(&mut context).expect("mutation resolves");
    let created = ObjectValue::typed("User").with_field("name", "Ada");
    assert_eq!(result, ResolverResult::Value(created.clone().into()));

    let payload = schema.object_type("CreateUserPayload").expect("payload type");
    let mut child = context.child("CreateUserPayload", "user");
    let data = payload.fields["user"].resolve(&mut child).expect("data resolves");
    assert_eq!(data, ResolverResult::Value(created.into()));
}

#[test]
fn test_errors_add_union_and_error_types() {
    let mutation = ObjectFieldDefinition::new("createUser")
        .result_type(RuntimeType::mutation_result(
            RuntimeType::reference("User"),
            vec![RuntimeType::exception("UserExistsException")],
        ))
        .argument(ArgumentDefinition::runtime("name", RuntimeType::string()))
        .resolve_with(|_| Err(FieldError::exception("UserExistsException", "taken")));

    let schema = SchemaBuilder::new()
        .add_type(query())
        .add_type(user())
        .add_type(ObjectTypeDefinition::new("Mutation").field(mutation))
        .add_mutation_conventions(MutationConventionOptions::default())
        .build()
        .expect("valid schema");

    let payload = schema.object_type("CreateUserPayload").expect("payload type");
    assert_eq!(payload.fields["errors"].ty.to_string(), "[CreateUserError!]");

    let union = schema
        .get_type("CreateUserError")
        .and_then(NamedType::as_union)
        .expect("error union");
    assert!(union.contains("UserExistsError"));
    let error_type = schema.object_type("UserExistsError").expect("error type");
    assert!(error_type.implements("Error"));
    assert!(schema.get_type("Error").and_then(NamedType::as_interface).is_some());

    let field = schema
        .mutation_type()
        .and_then(|mutation| mutation.field("createUser"))
        .expect("createUser field");
    assert_eq!(field.middleware_keys[0], MUTATION_ERRORS_MIDDLEWARE);

    let mut context = MiddlewareContext::new("Mutation", "createUser").with_argument(
        ArgumentValue::new("input", ObjectValue::new().with_field("name", "Ada")),
    );
    let result = field.resolve(&mut context).expect("exception is mapped");
    assert_eq!(result, ResolverResult::ErrorMarker);

    let data = payload.fields["user"]
        .resolve(&mut context.child("CreateUserPayload", "user"))
        .expect("data resolves");
    assert_eq!(data, ResolverResult::Value(RuntimeValue::Null));

    let errors = payload.fields["errors"]
        .resolve(&mut context.child("CreateUserPayload", "errors"))
        .expect("errors resolve");
    let ResolverResult::Value(RuntimeValue::List(errors)) = errors else {
        panic!("expected an error list, got {errors:?}");
    };
    assert_eq!(errors.len(), 1);
    let error = errors[0].as_object().expect("error object");
    assert_eq!(error.type_name(), Some("UserExistsException"));
    assert_eq!(
        schema.resolve_object_type(error).map(|t| t.name.as_str()),
        Some("UserExistsError")
    );
}

#[test]
fn test_user_payload_is_adapted() {
    let payload = ObjectTypeDefinition::new("CreateUserPayload")
        .field(ObjectFieldDefinition::new("user").type_syntax("User!"))
        .field(ObjectFieldDefinition::new("query").type_syntax("Query"));
    let mutation = ObjectFieldDefinition::new("createUser")
        .type_syntax("CreateUserPayload")
        .error(RuntimeType::exception("UserExistsException"));

    let schema = SchemaBuilder::new()
        .add_type(query())
        .add_type(user())
        .add_type(payload)
        .add_type(ObjectTypeDefinition::new("Mutation").field(mutation))
        .add_mutation_conventions(MutationConventionOptions::default())
        .build()
        .expect("valid schema");

    let field = schema
        .mutation_type()
        .and_then(|mutation| mutation.field("createUser"))
        .expect("createUser field");
    assert_eq!(field.ty.to_string(), "CreateUserPayload!");
    assert!(field.arguments.is_empty());

    let payload = schema.object_type("CreateUserPayload").expect("payload type");
    assert_eq!(payload.fields["user"].ty.to_string(), "User");
    assert!(
        payload.fields["user"]
            .middleware_keys
            .iter()
            .any(|key| key == PAYLOAD_NULL_ON_ERROR_MIDDLEWARE)
    );
    assert_eq!(payload.fields["query"].ty.to_string(), "Query");
    assert!(payload.fields["query"].middleware_keys.is_empty());
    assert_eq!(payload.fields["errors"].ty.to_string(), "[CreateUserError!]");
}

#[test]
fn test_list_payload_is_rejected() {
    let payload = ObjectTypeDefinition::new("CreateUserPayload")
        .field(ObjectFieldDefinition::new("user").type_syntax("User"));
    let mutation = ObjectFieldDefinition::new("createUser").type_syntax("[CreateUserPayload]");

    let err = SchemaBuilder::new()
        .add_type(query())
        .add_type(user())
        .add_type(payload)
        .add_type(ObjectTypeDefinition::new("Mutation").field(mutation))
        .add_mutation_conventions(MutationConventionOptions::default())
        .build()
        .expect_err("list payload");
    assert!(err.has_code(codes::MUTATION_PAYLOAD_MUST_BE_OBJECT));
}

#[test]
fn test_orphaned_convention_data() {
    let err = SchemaBuilder::new()
        .add_type(
            query().field(
                ObjectFieldDefinition::new("currentUser")
                    .type_syntax("User")
                    .mutation_convention(MutationContextData::new("currentUser")),
            ),
        )
        .add_type(user())
        .add_type(ObjectTypeDefinition::new("Mutation").field(create_user()))
        .add_mutation_conventions(MutationConventionOptions::default())
        .add_mutation_convention(MutationContextData::new("createUsr"))
        .build()
        .expect_err("orphaned configuration");

    let error = err
        .errors_with_code(codes::MUTATION_CONVENTION_NON_MUTATION_FIELDS)
        .next()
        .expect("orphans reported");
    assert_eq!(error.type_name(), Some("Mutation"));
    assert_eq!(
        error.extensions().get("fields").map(String::as_str),
        Some("createUsr, currentUser")
    );
}

#[test]
fn test_error_union_name_collision() {
    let mutation = ObjectFieldDefinition::new("createUser")
        .result_type(RuntimeType::reference("User"))
        .error(RuntimeType::exception("UserExistsException"));

    let err = SchemaBuilder::new()
        .add_type(query())
        .add_type(user())
        .add_type(
            ObjectTypeDefinition::new("CreateUserError")
                .field(ObjectFieldDefinition::new("code").type_syntax("Int")),
        )
        .add_type(ObjectTypeDefinition::new("Mutation").field(mutation))
        .add_mutation_conventions(MutationConventionOptions::default())
        .build()
        .expect_err("union collides with user type");

    let error = err
        .errors_with_code(codes::MUTATION_CONVENTION_TYPE_NAME_COLLISION)
        .next()
        .expect("collision reported");
    assert_eq!(error.type_name(), Some("CreateUserError"));
    assert_eq!(error.field_name(), Some("createUser"));
    assert_eq!(
        error.extensions().get("mutation").map(String::as_str),
        Some("createUser")
    );
}

#[test]
fn test_synthesized_error_type_name_collision() {
    let mutation = ObjectFieldDefinition::new("createUser")
        .result_type(RuntimeType::reference("User"))
        .error(RuntimeType::exception("UserExistsException"));

    let err = SchemaBuilder::new()
        .add_type(query())
        .add_type(user())
        .add_type(
            ObjectTypeDefinition::new("UserExistsError")
                .field(ObjectFieldDefinition::new("code").type_syntax("Int")),
        )
        .add_type(ObjectTypeDefinition::new("Mutation").field(mutation))
        .add_mutation_conventions(MutationConventionOptions::default())
        .build()
        .expect_err("synthesized error type collides");

    let error = err
        .errors_with_code(codes::DUPLICATE_TYPE_NAME)
        .next()
        .expect("duplicate name reported");
    assert_eq!(error.type_name(), Some("UserExistsError"));
    assert_eq!(
        error.extensions().get("mutation").map(String::as_str),
        Some("createUser")
    );
}

#[test]
fn test_directive_overrides_in_sdl() {
    let schema = SchemaBuilder::new()
        .add_document(
            r#"
            type Query { hello: String }

            type User { name: String }

            type Mutation {
              renameUser(id: ID!, name: String!): User
                @mutationConvention(inputTypeName: "RenameInput", payloadFieldName: "renamed")
              ping: String @mutationConvention(enabled: false)
            }
            "#,
        )
        .add_mutation_conventions(MutationConventionOptions::default())
        .build()
        .expect("valid schema");

    let mutation = schema.mutation_type().expect("mutation type");
    let rename = mutation.field("renameUser").expect("renameUser field");
    assert_eq!(rename.arguments["input"].ty.to_string(), "RenameInput!");
    assert_eq!(rename.ty.to_string(), "RenameUserPayload!");
    assert!(rename.directives.is_empty());

    let input = schema
        .get_type("RenameInput")
        .and_then(NamedType::as_input_object)
        .expect("input type");
    assert_eq!(input.fields.keys().collect::<Vec<_>>(), vec!["id", "name"]);
    let payload = schema.object_type("RenameUserPayload").expect("payload type");
    assert_eq!(payload.fields["renamed"].ty.to_string(), "User");

    let ping = mutation.field("ping").expect("ping field");
    assert_eq!(ping.ty.to_string(), "String");
    assert!(ping.middleware_keys.is_empty());
}

#[test]
fn test_directive_on_type_is_rejected() {
    let err = SchemaBuilder::new()
        .add_document(
            r#"
            type Query @mutationConvention { hello: String }
            "#,
        )
        .build()
        .expect_err("directive on a type");
    assert!(err.has_code(codes::DIRECTIVE_LOCATION_INVALID));
}

#[test]
fn test_custom_names_and_opt_in() {
    let options = MutationConventionOptions::new()
        .input_argument_name("data")
        .payload_type_name_pattern("{MutationName}Result")
        .apply_to_all_mutations(false);
    let untouched = ObjectFieldDefinition::new("deleteUser")
        .type_syntax("Boolean")
        .argument(ArgumentDefinition::runtime("id", RuntimeType::string()));

    let schema = SchemaBuilder::new()
        .add_type(query())
        .add_type(user())
        .add_type(
            ObjectTypeDefinition::new("Mutation")
                .field(create_user())
                .field(untouched),
        )
        .add_mutation_conventions(options)
        .add_mutation_convention(MutationContextData::new("createUser").enabled(true))
        .build()
        .expect("valid schema");

    let mutation = schema.mutation_type().expect("mutation type");
    let create = mutation.field("createUser").expect("createUser field");
    assert_eq!(create.arguments["data"].ty.to_string(), "CreateUserInput!");
    assert_eq!(create.ty.to_string(), "CreateUserResult!");

    let delete = mutation.field("deleteUser").expect("deleteUser field");
    assert!(delete.argument("id").is_some());
    assert_eq!(delete.ty.to_string(), "Boolean");
    assert!(schema.get_type("DeleteUserInput").is_none());
}

#[test]
fn test_folded_argument_defaults_reach_resolver() {
    let mutation = ObjectFieldDefinition::new("createUser")
        .result_type(RuntimeType::reference("User"))
        .argument(ArgumentDefinition::runtime("name", RuntimeType::string()))
        .argument(
            ArgumentDefinition::runtime("age", RuntimeType::long()).default_value(ValueNode::int(18)),
        )
        .resolve_with(|context| {
            let age = context.argument("age").cloned().unwrap_or_default();
            Ok(ResolverResult::Value(age))
        });

    let schema = SchemaBuilder::new()
        .add_type(query())
        .add_type(user())
        .add_type(ObjectTypeDefinition::new("Mutation").field(mutation))
        .add_mutation_conventions(MutationConventionOptions::default())
        .build()
        .expect("valid schema");

    let field = schema
        .mutation_type()
        .and_then(|mutation| mutation.field("createUser"))
        .expect("createUser field");
    let mut context = MiddlewareContext::new("Mutation", "createUser").with_argument(
        ArgumentValue::new("input", ObjectValue::new().with_field("name", "Ada")),
    );
    let result = field.resolve(&mut context).expect("mutation resolves");
    assert_eq!(result, ResolverResult::Value(RuntimeValue::Long(18)));
}

#[test]
fn test_invalid_directive_consumes_builder_data() {
    let err = SchemaBuilder::new()
        .add_document(
            r#"
            type Query { hello: String }

            type User { name: String }

            type Mutation {
              createUser(name: String!): User @mutationConvention(bogus: "x")
            }
            "#,
        )
        .add_mutation_conventions(MutationConventionOptions::default())
        .add_mutation_convention(MutationContextData::new("createUser"))
        .build()
        .expect_err("unknown directive argument");

    assert!(err.has_code(codes::DIRECTIVE_ARGUMENT_UNKNOWN));
    assert!(!err.has_code(codes::MUTATION_CONVENTION_NON_MUTATION_FIELDS));
}

#[test]
fn test_user_payload_nulls_data_on_error() {
    let payload = ObjectTypeDefinition::new("CreateUserPayload")
        .field(ObjectFieldDefinition::new("user").type_syntax("User!"));
    let mutation = ObjectFieldDefinition::new("createUser")
        .type_syntax("CreateUserPayload")
        .argument(ArgumentDefinition::runtime("name", RuntimeType::string()))
        .error(RuntimeType::exception("UserExistsException"))
        .resolve_with(|context| match context.argument("name").and_then(RuntimeValue::as_str) {
            Some("taken") => Err(FieldError::exception("UserExistsException", "taken")),
            _ => Ok(ResolverResult::Value(
                ObjectValue::typed("CreateUserPayload")
                    .with_field("user", ObjectValue::typed("User").with_field("name", "Ada"))
                    .into(),
            )),
        });

    let schema = SchemaBuilder::new()
        .add_type(query())
        .add_type(user())
        .add_type(payload)
        .add_type(ObjectTypeDefinition::new("Mutation").field(mutation))
        .add_mutation_conventions(MutationConventionOptions::default())
        .build()
        .expect("valid schema");

    let field = schema
        .mutation_type()
        .and_then(|mutation| mutation.field("createUser"))
        .expect("createUser field");
    let payload = schema.object_type("CreateUserPayload").expect("payload type");

    let mut context = MiddlewareContext::new("Mutation", "createUser").with_argument(
        ArgumentValue::new("input", ObjectValue::new().with_field("name", "taken")),
    );
    let result = field.resolve(&mut context).expect("exception is mapped");
    assert_eq!(result, ResolverResult::ErrorMarker);

    let data = payload.fields["user"]
        .resolve(&mut context.child("CreateUserPayload", "user"))
        .expect("data resolves");
    assert_eq!(data, ResolverResult::Value(RuntimeValue::Null));

    let errors = payload.fields["errors"]
        .resolve(&mut context.child("CreateUserPayload", "errors"))
        .expect("errors resolve");
    let ResolverResult::Value(RuntimeValue::List(errors)) = errors else {
        panic!("expected an error list, got {errors:?}");
    };
    assert_eq!(
        errors[0].as_object().and_then(ObjectValue::type_name),
        Some("UserExistsException")
    );

    let mut context = MiddlewareContext::new("Mutation", "createUser").with_argument(
        ArgumentValue::new("input", ObjectValue::new().with_field("name", "Ada")),
    );
    field.resolve(&mut context).expect("mutation resolves");
    let data = payload.fields["user"]
        .resolve(&mut context.child("CreateUserPayload", "user"))
        .expect("data resolves");
    assert_eq!(
        data,
        ResolverResult::Value(ObjectValue::typed("User").with_field("name", "Ada").into())
    );
    let errors = payload.fields["errors"]
        .resolve(&mut context.child("CreateUserPayload", "errors"))
        .expect("errors resolve");
    assert_eq!(errors, ResolverResult::Value(RuntimeValue::Null));
}
