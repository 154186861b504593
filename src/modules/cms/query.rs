//! Serialization of nested content queries into the CMS bracket convention.
//!
//! `populate[images][populate][0]=icon`, `filters[date][gte]=2024-01-01`,
//! `sort=order:asc`. Root-level populate lists are comma-joined into a single
//! parameter while nested lists are indexed one parameter per element; the
//! CMS parses the two positions differently.

use reqwest::Url;

use super::error::CmsError;
use crate::shared::constants::POPULATE_ROOT;

/// Which related fields to include in a response
#[derive(Debug, Clone, PartialEq)]
pub enum Populate {
    Single(String),
    List(Vec<String>),
    Relations(Vec<(String, Relation)>),
}

/// How a single named relation is populated
#[derive(Debug, Clone, PartialEq)]
pub enum Relation {
    /// `prefix[key]=true`
    All,
    /// An object with its own `populate` key, unwrapped one level
    Populate(Populate),
    /// Any other nested populate shape
    Nested(Populate),
}

impl Populate {
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Populate::List(items.into_iter().map(Into::into).collect())
    }

    pub fn relations<I, K>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, Relation)>,
        K: Into<String>,
    {
        Populate::Relations(items.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<&str> for Populate {
    fn from(value: &str) -> Self {
        Populate::Single(value.to_string())
    }
}

impl From<String> for Populate {
    fn from(value: String) -> Self {
        Populate::Single(value)
    }
}

impl<const N: usize> From<[&str; N]> for Populate {
    fn from(value: [&str; N]) -> Self {
        Populate::list(value)
    }
}

impl Relation {
    pub fn populate(inner: impl Into<Populate>) -> Self {
        Relation::Populate(inner.into())
    }

    pub fn nested(inner: impl Into<Populate>) -> Self {
        Relation::Nested(inner.into())
    }
}

/// Filter applied to one field. Nesting stops two levels below the field.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `filters[field]=value`
    Eq(String),
    /// `filters[field][op]=value` or `filters[field][op][sub]=value`
    Operators(Vec<(String, Operand)>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(String),
    Nested(Vec<(String, String)>),
}

impl Filter {
    pub fn eq(value: impl ToString) -> Self {
        Filter::Eq(value.to_string())
    }

    pub fn op(operator: impl Into<String>, value: impl ToString) -> Self {
        Filter::Operators(vec![(operator.into(), Operand::Value(value.to_string()))])
    }

    /// Add another operator to the same field
    pub fn and(self, operator: impl Into<String>, value: impl ToString) -> Self {
        let operand = (operator.into(), Operand::Value(value.to_string()));
        match self {
            Filter::Operators(mut ops) => {
                ops.push(operand);
                Filter::Operators(ops)
            }
            Filter::Eq(eq) => Filter::Operators(vec![
                ("$eq".to_string(), Operand::Value(eq)),
                operand,
            ]),
        }
    }

    /// Operator whose value is itself an operator map (e.g. `[slug][$eq]`)
    pub fn nested<I, K, V>(operator: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.to_string()))
            .collect();
        Filter::Operators(vec![(operator.into(), Operand::Nested(entries))])
    }
}

/// Query configuration for one CMS request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CmsQuery {
    populate: Option<Populate>,
    filters: Vec<(String, Filter)>,
    sort: Vec<String>,
    params: Vec<(String, Vec<String>)>,
}

impl CmsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn populate(mut self, populate: impl Into<Populate>) -> Self {
        self.populate = Some(populate.into());
        self
    }

    pub fn filter(mut self, field: impl Into<String>, filter: Filter) -> Self {
        self.filters.push((field.into(), filter));
        self
    }

    /// Append a sort key; precedence follows insertion order
    pub fn sort(mut self, key: impl Into<String>) -> Self {
        self.sort.push(key.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), vec![value.to_string()]));
        self
    }

    pub fn param_list<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let values = values.into_iter().map(|v| v.to_string()).collect();
        self.params.push((key.into(), values));
        self
    }

    /// Flatten into ordered query pairs: populate, filters, sort, passthrough
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if let Some(populate) = &self.populate {
            push_populate(&mut pairs, populate, POPULATE_ROOT);
        }

        for (field, filter) in &self.filters {
            push_filter(&mut pairs, field, filter);
        }

        for key in &self.sort {
            pairs.push(("sort".to_string(), key.clone()));
        }

        for (key, values) in &self.params {
            for value in values {
                pairs.push((key.clone(), value.clone()));
            }
        }

        pairs
    }
}

fn push_populate(pairs: &mut Vec<(String, String)>, populate: &Populate, prefix: &str) {
    match populate {
        Populate::Single(value) => pairs.push((prefix.to_string(), value.clone())),
        Populate::List(items) => {
            if prefix == POPULATE_ROOT {
                pairs.push((prefix.to_string(), items.join(",")));
            } else {
                for (index, item) in items.iter().enumerate() {
                    pairs.push((format!("{prefix}[{index}]"), item.clone()));
                }
            }
        }
        Populate::Relations(relations) => {
            for (key, relation) in relations {
                match relation {
                    Relation::All => pairs.push((format!("{prefix}[{key}]"), "true".to_string())),
                    Relation::Populate(inner) => {
                        push_populate(pairs, inner, &format!("{prefix}[{key}][populate]"))
                    }
                    Relation::Nested(inner) => {
                        push_populate(pairs, inner, &format!("{prefix}[{key}]"))
                    }
                }
            }
        }
    }
}

fn push_filter(pairs: &mut Vec<(String, String)>, field: &str, filter: &Filter) {
    match filter {
        Filter::Eq(value) => pairs.push((format!("filters[{field}]"), value.clone())),
        Filter::Operators(ops) => {
            for (op, operand) in ops {
                match operand {
                    Operand::Value(value) => {
                        pairs.push((format!("filters[{field}][{op}]"), value.clone()))
                    }
                    Operand::Nested(entries) => {
                        for (sub, value) in entries {
                            pairs.push((format!("filters[{field}][{op}][{sub}]"), value.clone()));
                        }
                    }
                }
            }
        }
    }
}

/// Build `{base_url}/api/{endpoint}` with the query appended
pub fn build_url(base_url: &str, endpoint: &str, query: &CmsQuery) -> Result<Url, CmsError> {
    let endpoint = endpoint.trim_start_matches('/');
    let raw = format!("{}/api/{}", base_url.trim_end_matches('/'), endpoint);
    let mut url = Url::parse(&raw).map_err(|e| CmsError::InvalidUrl(format!("{raw}: {e}")))?;

    let pairs = query.to_pairs();
    if !pairs.is_empty() {
        let mut serializer = url.query_pairs_mut();
        for (key, value) in &pairs {
            serializer.append_pair(key, value);
        }
    }

    Ok(url)
}
