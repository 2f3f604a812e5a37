use serde::{Deserialize, Deserializer};

// the web client sends <select> values as strings, so ids and difficulty may
// arrive as either "3" or 3
#[derive(Deserialize)]
#[serde(untagged)]
pub enum IntOrString {
    Int(i64),
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "IntOrString")]
pub struct Flexi64(pub i64);

impl TryFrom<IntOrString> for Flexi64 {
    type Error = String;

    fn try_from(value: IntOrString) -> Result<Self, Self::Error> {
        match value {
            IntOrString::Int(v) => Ok(Flexi64(v)),
            IntOrString::Str(s) => match s.trim().parse::<i64>() {
                Ok(v) => Ok(Flexi64(v)),
                Err(_) => Err(format!("Wrong value {s}, can not parse to i64")),
            },
        }
    }
}

/// `?page=N`. Missing, zero or unparsable values read as the first page.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page")]
    #[serde(deserialize_with = "deserialize_page")]
    pub page: usize,
}

fn first_page() -> usize {
    1
}

fn deserialize_page<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|page| *page > 0)
        .unwrap_or_else(first_page))
}
