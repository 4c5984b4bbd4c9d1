use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("empty validation rule")]
    Empty,

    #[error("validation rule `{0}` requires parameters")]
    MissingParameters(String),

    #[error("validation rule `{0}` needs numeric bounds")]
    Bounds(String),

    #[error("regex rule `{0}` must be wrapped in delimiters")]
    Delimiter(String),

    #[error("invalid regex in validation rule: {0}")]
    Regex(#[from] regex::Error),
}

/// One parsed entry of a `|`-separated rule string.
#[derive(Debug, Clone)]
pub enum Rule {
    Required,
    String,
    Numeric,
    Array,
    Between {
        min: f64,
        max: f64,
    },
    Regex(Regex),
    Unique {
        table: String,
        column: Option<String>,
        except: Option<String>,
        id_column: String,
    },
    Exists {
        table: String,
        column: Option<String>,
    },
    NotIn(Vec<String>),
    Custom {
        name: String,
        parameters: Vec<String>,
    },
}

impl Rule {
    pub fn parse(raw: &str) -> Result<Self, RuleError> {
        let raw = raw.trim();
        let (name, params) = match raw.split_once(':') {
            Some((name, params)) => (name.trim(), Some(params)),
            None => (raw, None),
        };
        if name.is_empty() {
            return Err(RuleError::Empty);
        }

        let rule = match name.to_ascii_lowercase().as_str() {
            "required" => Rule::Required,
            "string" => Rule::String,
            "numeric" => Rule::Numeric,
            "array" => Rule::Array,
            "between" => {
                let bounds = split_params(name, params)?;
                let [min, max] = bounds.as_slice() else {
                    return Err(RuleError::Bounds(raw.to_string()));
                };
                match (min.parse::<f64>(), max.parse::<f64>()) {
                    (Ok(min), Ok(max)) => Rule::Between { min, max },
                    _ => return Err(RuleError::Bounds(raw.to_string())),
                }
            }
            // The pattern may contain commas, so it is never split.
            "regex" => {
                let pattern = params.ok_or_else(|| RuleError::MissingParameters(name.into()))?;
                Rule::Regex(compile_delimited(pattern)?)
            }
            "unique" => {
                let params = split_params(name, params)?;
                let mut params = params.into_iter();
                Rule::Unique {
                    table: params.next().unwrap_or_default(),
                    column: params.next().filter(|c| !c.is_empty()),
                    except: params
                        .next()
                        .filter(|e| !e.is_empty() && !e.eq_ignore_ascii_case("null")),
                    id_column: params
                        .next()
                        .filter(|c| !c.is_empty())
                        .unwrap_or_else(|| "id".to_string()),
                }
            }
            "exists" => {
                let params = split_params(name, params)?;
                let mut params = params.into_iter();
                Rule::Exists {
                    table: params.next().unwrap_or_default(),
                    column: params.next().filter(|c| !c.is_empty()),
                }
            }
            "not_in" => Rule::NotIn(split_params(name, params)?),
            _ => Rule::Custom {
                name: name.to_string(),
                parameters: params.map(split_list).unwrap_or_default(),
            },
        };
        Ok(rule)
    }

    /// Implicit rules run even when the field is absent.
    pub fn is_implicit(&self) -> bool {
        matches!(self, Rule::Required)
    }
}

fn split_list(params: &str) -> Vec<String> {
    params.split(',').map(|p| p.trim().to_string()).collect()
}

fn split_params(name: &str, params: Option<&str>) -> Result<Vec<String>, RuleError> {
    match params {
        Some(p) if !p.trim().is_empty() => Ok(split_list(p)),
        _ => Err(RuleError::MissingParameters(name.to_string())),
    }
}

/// Compiles `/pattern/flags`. Only the `i`, `m`, `s` and `x` flags carry over.
fn compile_delimited(raw: &str) -> Result<Regex, RuleError> {
    let mut chars = raw.chars();
    let delimiter = chars
        .next()
        .filter(|c| !c.is_alphanumeric() && *c != '\\')
        .ok_or_else(|| RuleError::Delimiter(raw.to_string()))?;
    let body = &raw[delimiter.len_utf8()..];
    let end = body
        .rfind(delimiter)
        .ok_or_else(|| RuleError::Delimiter(raw.to_string()))?;
    let (pattern, flags) = (&body[..end], &body[end + delimiter.len_utf8()..]);

    let flags: String = flags.chars().filter(|f| "imsx".contains(*f)).collect();
    let pattern = if flags.is_empty() {
        pattern.to_string()
    } else {
        format!("(?{flags}){pattern}")
    };
    Ok(Regex::new(&pattern)?)
}

/// Field name to rule list, in declaration order.
#[derive(Debug, Default, Clone)]
pub struct RuleSet {
    fields: Vec<(String, Vec<Rule>)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, rules: &str) -> Result<Self, RuleError> {
        let parsed = rules
            .split('|')
            .filter(|r| !r.trim().is_empty())
            .map(Rule::parse)
            .collect::<Result<Vec<_>, _>>()?;
        self.fields.push((name.to_string(), parsed));
        Ok(self)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.fields
            .iter()
            .map(|(name, rules)| (name.as_str(), rules.as_slice()))
    }

    pub fn rules_for(&self, name: &str) -> Option<&[Rule]> {
        self.iter().find(|(field, _)| *field == name).map(|(_, rules)| rules)
    }
}
