use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two text fields read from a sheet's title block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Number,
    Title,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Number => write!(f, "number"),
            Field::Title => write!(f, "title"),
        }
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "number" | "n" => Ok(Field::Number),
            "title" | "t" => Ok(Field::Title),
            other => Err(format!("unknown field '{other}' (expected 'number' or 'title')")),
        }
    }
}

/// One page of the drawing set with its extracted and edited fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRecord {
    /// 1-based page index in the source document.
    pub page_index: usize,
    pub extracted_number: String,
    pub extracted_title: String,
    #[serde(default)]
    pub included: bool,
    pub override_number: String,
    pub override_title: String,
}

impl SheetRecord {
    /// New record with overrides initialized to the extracted values.
    pub fn new(page_index: usize, number: String, title: String) -> Self {
        SheetRecord {
            page_index,
            override_number: number.clone(),
            override_title: title.clone(),
            extracted_number: number,
            extracted_title: title,
            included: false,
        }
    }

    /// Current (possibly edited) value of `field`.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Number => &self.override_number,
            Field::Title => &self.override_title,
        }
    }

    pub fn extracted(&self, field: Field) -> &str {
        match field {
            Field::Number => &self.extracted_number,
            Field::Title => &self.extracted_title,
        }
    }

    pub fn set_value(&mut self, field: Field, value: String) {
        match field {
            Field::Number => self.override_number = value,
            Field::Title => self.override_title = value,
        }
    }

    pub fn is_edited(&self, field: Field) -> bool {
        self.value(field) != self.extracted(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_copies_extraction_into_overrides() {
        let r = SheetRecord::new(2, "A-102".into(), "Roof Plan".into());
        assert_eq!(r.value(Field::Number), "A-102");
        assert_eq!(r.value(Field::Title), "Roof Plan");
        assert!(!r.included);
        assert!(!r.is_edited(Field::Number));
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("Number".parse::<Field>().unwrap(), Field::Number);
        assert_eq!("t".parse::<Field>().unwrap(), Field::Title);
        assert!("label".parse::<Field>().is_err());
    }
}
