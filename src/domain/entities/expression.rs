use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(DateTime<Utc>),
    Null,
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Text(value.to_string())
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Number(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ge,
    Le,
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Ge => "ge",
            CompareOp::Le => "le",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    And(Vec<FilterExpr>),
    Or(Vec<FilterExpr>),
    Compare {
        property: String,
        op: CompareOp,
        value: Literal,
    },
    Contains { property: String, value: String },
    /// Some element of `collection` satisfies `condition`; properties inside
    /// `condition` are relative to the element.
    Any {
        collection: String,
        condition: Box<FilterExpr>,
    },
    In {
        property: String,
        values: Vec<Literal>,
    },
    Empty,
}

impl FilterExpr {
    pub fn compare(property: impl Into<String>, op: CompareOp, value: impl Into<Literal>) -> Self {
        FilterExpr::Compare {
            property: property.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(property: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::compare(property, CompareOp::Eq, value)
    }

    pub fn contains(property: impl Into<String>, value: impl Into<String>) -> Self {
        FilterExpr::Contains {
            property: property.into(),
            value: value.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FilterExpr::Empty => true,
            FilterExpr::And(items) | FilterExpr::Or(items) => items.iter().all(FilterExpr::is_empty),
            _ => false,
        }
    }
}
