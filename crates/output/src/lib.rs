use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
    /// One id (or value) per line, for piping into other tools.
    Plain,
}

pub struct OutputRenderer {
    format: OutputFormat,
}

impl OutputRenderer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn render<T: Serialize>(&self, value: &T) -> Result<()> {
        let json_value = serde_json::to_value(value)?;

        match self.format {
            OutputFormat::Table => match Self::tabulate(&json_value) {
                Some(table) => println!("{table}"),
                None => println!("{}", serde_json::to_string_pretty(&json_value)?),
            },
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&json_value)?);
            }
            OutputFormat::Yaml => {
                println!("{}", serde_yaml::to_string(&json_value)?);
            }
            OutputFormat::Plain => {
                for line in Self::plain_lines(&json_value) {
                    println!("{line}");
                }
            }
        }

        Ok(())
    }

    fn tabulate(value: &Value) -> Option<String> {
        let rows = match value {
            Value::Array(rows) if !rows.is_empty() => rows,
            _ => return None,
        };

        // Column order follows first appearance, so the serialized field
        // order of the row structs is preserved.
        let mut headers: Vec<String> = Vec::new();
        for row in rows {
            if let Value::Object(obj) = row {
                for key in obj.keys() {
                    if !headers.iter().any(|h| h == key) {
                        headers.push(key.clone());
                    }
                }
            }
        }

        if headers.is_empty() {
            return None;
        }

        let mut builder = Builder::default();
        builder.push_record(headers.clone());
        for row in rows {
            let Value::Object(obj) = row else { continue };
            let record: Vec<String> = headers
                .iter()
                .map(|h| obj.get(h).map(Self::cell_text).unwrap_or_default())
                .collect();
            builder.push_record(record);
        }

        Some(builder.build().with(Style::rounded()).to_string())
    }

    fn plain_lines(value: &Value) -> Vec<String> {
        match value {
            Value::Array(rows) => rows.iter().flat_map(Self::plain_lines).collect(),
            Value::Object(obj) => {
                let picked = obj
                    .get("id")
                    .or_else(|| obj.values().next())
                    .map(Self::cell_text);
                picked.into_iter().filter(|s| !s.is_empty()).collect()
            }
            Value::Null => Vec::new(),
            other => vec![Self::cell_text(other)],
        }
    }

    fn cell_text(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
            other => serde_json::to_string(other).unwrap_or_default(),
        }
    }
}
