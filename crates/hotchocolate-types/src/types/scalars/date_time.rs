use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::error::ScalarError;
use crate::language::{ValueKind, ValueNode};
use crate::types::runtime::RuntimeType;
use crate::value::RuntimeValue;

use super::ScalarType;

/// The `DateTime` scalar, bound to [`OffsetDateTime`].
///
/// Values are written in RFC 3339 extended format with an explicit offset,
/// `2018-06-11T08:46:14+04:00`; UTC is written as `+00:00`, never `Z`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeType;

impl DateTimeType {
    /// Formats a date-time with an explicit numeric offset.
    pub fn format(value: &OffsetDateTime) -> Option<String> {
        if value.nanosecond() == 0 {
            value
                .format(format_description!(
                    "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
                ))
                .ok()
        } else {
            value
                .format(format_description!(
                    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3][offset_hour sign:mandatory]:[offset_minute]"
                ))
                .ok()
        }
    }
}

impl ScalarType for DateTimeType {
    fn name(&self) -> &str {
        "DateTime"
    }

    fn description(&self) -> Option<&str> {
        Some("The `DateTime` scalar represents an ISO-8601 compliant date time type.")
    }

    fn runtime_type(&self) -> Option<RuntimeType> {
        Some(RuntimeType::date_time())
    }

    fn accepts_literal(&self, kind: ValueKind) -> bool {
        kind == ValueKind::String
    }

    fn is_instance_of_type(&self, literal: Option<&ValueNode>) -> Result<bool, ScalarError> {
        match literal {
            None => Err(ScalarError::argument_null(self.name())),
            Some(ValueNode::Null) => Ok(true),
            Some(ValueNode::String(text)) => Ok(OffsetDateTime::parse(text, &Rfc3339).is_ok()),
            Some(_) => Ok(false),
        }
    }

    fn parse_literal(&self, literal: &ValueNode) -> Result<RuntimeValue, ScalarError> {
        match literal {
            ValueNode::Null => Ok(RuntimeValue::Null),
            ValueNode::String(text) => OffsetDateTime::parse(text, &Rfc3339)
                .map(RuntimeValue::DateTime)
                .map_err(|_| ScalarError::invalid_literal(self.name(), ValueKind::String)),
            other => Err(ScalarError::invalid_literal(self.name(), other.kind())),
        }
    }

    fn parse_value(&self, value: &RuntimeValue) -> Result<ValueNode, ScalarError> {
        match value {
            RuntimeValue::Null => Ok(ValueNode::Null),
            RuntimeValue::DateTime(date_time) => Self::format(date_time)
                .map(ValueNode::String)
                .ok_or_else(|| ScalarError::invalid_value(self.name(), value.type_name())),
            other => Err(ScalarError::invalid_value(self.name(), other.type_name())),
        }
    }

    fn serialize(&self, value: &RuntimeValue) -> Result<RuntimeValue, ScalarError> {
        match value {
            RuntimeValue::Null => Ok(RuntimeValue::Null),
            RuntimeValue::DateTime(date_time) => Self::format(date_time)
                .map(RuntimeValue::String)
                .ok_or_else(|| ScalarError::invalid_value(self.name(), value.type_name())),
            other => Err(ScalarError::invalid_value(self.name(), other.type_name())),
        }
    }
}

/// The `Date` scalar, bound to [`Date`]. Values are written as `yyyy-MM-dd`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateType;

impl DateType {
    fn format(value: &Date) -> Option<String> {
        value.format(format_description!("[year]-[month]-[day]")).ok()
    }

    fn parse(text: &str) -> Option<Date> {
        Date::parse(text, format_description!("[year]-[month]-[day]")).ok()
    }
}

impl ScalarType for DateType {
    fn name(&self) -> &str {
        "Date"
    }

    fn description(&self) -> Option<&str> {
        Some("The `Date` scalar represents an ISO-8601 compliant date type.")
    }

    fn runtime_type(&self) -> Option<RuntimeType> {
        Some(RuntimeType::date())
    }

    fn accepts_literal(&self, kind: ValueKind) -> bool {
        kind == ValueKind::String
    }

    fn parse_literal(&self, literal: &ValueNode) -> Result<RuntimeValue, ScalarError> {
        match literal {
            ValueNode::Null => Ok(RuntimeValue::Null),
            ValueNode::String(text) => Self::parse(text)
                .map(RuntimeValue::Date)
                .ok_or_else(|| ScalarError::invalid_literal(self.name(), ValueKind::String)),
            other => Err(ScalarError::invalid_literal(self.name(), other.kind())),
        }
    }

    fn parse_value(&self, value: &RuntimeValue) -> Result<ValueNode, ScalarError> {
        match value {
            RuntimeValue::Null => Ok(ValueNode::Null),
            RuntimeValue::Date(date) => Self::format(date)
                .map(ValueNode::String)
                .ok_or_else(|| ScalarError::invalid_value(self.name(), value.type_name())),
            other => Err(ScalarError::invalid_value(self.name(), other.type_name())),
        }
    }

    fn serialize(&self, value: &RuntimeValue) -> Result<RuntimeValue, ScalarError> {
        match value {
            RuntimeValue::Null => Ok(RuntimeValue::Null),
            RuntimeValue::Date(date) => Self::format(date)
                .map(RuntimeValue::String)
                .ok_or_else(|| ScalarError::invalid_value(self.name(), value.type_name())),
            other => Err(ScalarError::invalid_value(self.name(), other.type_name())),
        }
    }
}
