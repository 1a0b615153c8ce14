//! Condition evaluation.
//!
//! Pure functions of the condition and the entity's current fields, so the
//! engine can evaluate each person condition once per person and each day
//! condition once per day instead of once per grid cell.

use crate::error::{ConditionError, Subject};
use packwise_model::{
    Condition, ConditionValue, Day, DayCondition, DayField, Operator, Person, PersonCondition,
    PersonField,
};

/// Decides whether `condition` holds for the given person / day.
///
/// Only the entity the condition is written against is consulted; the other
/// may be `None`.
pub fn matches(
    condition: &Condition,
    person: Option<&Person>,
    day: Option<&Day>,
) -> Result<bool, ConditionError> {
    match condition {
        Condition::Person(c) => {
            let person = person.ok_or(ConditionError::MissingSubject(Subject::Person))?;
            matches_person(c, person)
        }
        Condition::Day(c) => {
            let day = day.ok_or(ConditionError::MissingSubject(Subject::Day))?;
            matches_day(c, day)
        }
    }
}

/// Logical AND over a rule's conditions. Empty matches everything.
///
/// Stops at the first failing or erroring condition; the error carries the
/// index of the condition that raised it.
pub fn matches_all(
    conditions: &[Condition],
    person: Option<&Person>,
    day: Option<&Day>,
) -> Result<bool, (usize, ConditionError)> {
    for (index, condition) in conditions.iter().enumerate() {
        if !matches(condition, person, day).map_err(|e| (index, e))? {
            return Ok(false);
        }
    }
    Ok(true)
}

pub(crate) fn subject_of(condition: &Condition) -> Subject {
    match condition {
        Condition::Person(_) => Subject::Person,
        Condition::Day(_) => Subject::Day,
    }
}

fn matches_person(c: &PersonCondition, person: &Person) -> Result<bool, ConditionError> {
    match c.field {
        PersonField::Age => {
            let expected = number(&c.value, "age")?;
            let op = numeric_op(c.operator, "age")?;
            Ok(person.age.is_some_and(|age| op(i64::from(age), expected)))
        }
        PersonField::Gender => {
            let expected = text(&c.value, "gender")?;
            let equal = equality(c.operator, "gender")?;
            Ok(person
                .gender
                .is_some_and(|g| equal == g.as_str().eq_ignore_ascii_case(expected)))
        }
        PersonField::Name => compare_text(c.operator, &person.name, text(&c.value, "name")?, "name"),
    }
}

fn matches_day(c: &DayCondition, day: &Day) -> Result<bool, ConditionError> {
    match c.field {
        DayField::Location => compare_text(
            c.operator,
            &day.location,
            text(&c.value, "location")?,
            "location",
        ),
        DayField::ExpectedClimate => compare_text(
            c.operator,
            &day.expected_climate,
            text(&c.value, "expected_climate")?,
            "expected_climate",
        ),
        DayField::Travel => {
            let expected = match c.value {
                ConditionValue::Bool(b) => b,
                _ => {
                    return Err(ConditionError::ValueType {
                        field: "travel",
                        expected: "boolean",
                    });
                }
            };
            let equal = equality(c.operator, "travel")?;
            Ok(equal == (day.travel == expected))
        }
        DayField::Items => {
            let expected = text(&c.value, "items")?.to_lowercase();
            let mut items = day.items.iter().map(|i| i.to_lowercase());
            match c.operator {
                Operator::Equals => Ok(items.any(|i| i == expected)),
                Operator::NotEquals => Ok(!items.any(|i| i == expected)),
                Operator::Contains => Ok(items.any(|i| i.contains(&expected))),
                operator => Err(ConditionError::UnsupportedOperator {
                    field: "items",
                    operator,
                }),
            }
        }
    }
}

fn number(value: &ConditionValue, field: &'static str) -> Result<i64, ConditionError> {
    match value {
        ConditionValue::Number(n) => Ok(*n),
        _ => Err(ConditionError::ValueType {
            field,
            expected: "number",
        }),
    }
}

fn text<'a>(value: &'a ConditionValue, field: &'static str) -> Result<&'a str, ConditionError> {
    match value {
        ConditionValue::Text(s) => Ok(s),
        _ => Err(ConditionError::ValueType {
            field,
            expected: "text",
        }),
    }
}

/// `true` for `Equals`, `false` for `NotEquals`.
fn equality(operator: Operator, field: &'static str) -> Result<bool, ConditionError> {
    match operator {
        Operator::Equals => Ok(true),
        Operator::NotEquals => Ok(false),
        operator => Err(ConditionError::UnsupportedOperator { field, operator }),
    }
}

fn numeric_op(operator: Operator, field: &'static str) -> Result<fn(i64, i64) -> bool, ConditionError> {
    let op: fn(i64, i64) -> bool = match operator {
        Operator::Equals => |a, b| a == b,
        Operator::NotEquals => |a, b| a != b,
        Operator::GreaterThan => |a, b| a > b,
        Operator::GreaterThanOrEqual => |a, b| a >= b,
        Operator::LessThan => |a, b| a < b,
        Operator::LessThanOrEqual => |a, b| a <= b,
        Operator::Contains => {
            return Err(ConditionError::UnsupportedOperator { field, operator });
        }
    };
    Ok(op)
}

/// Case-insensitive text comparison.
fn compare_text(
    operator: Operator,
    actual: &str,
    expected: &str,
    field: &'static str,
) -> Result<bool, ConditionError> {
    let actual = actual.to_lowercase();
    let expected = expected.to_lowercase();
    match operator {
        Operator::Equals => Ok(actual == expected),
        Operator::NotEquals => Ok(actual != expected),
        Operator::Contains => Ok(actual.contains(&expected)),
        operator => Err(ConditionError::UnsupportedOperator { field, operator }),
    }
}
