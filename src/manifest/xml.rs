//! XML representation of a manifest.
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <Bundle>
//!   <OutputFile>site.min.css</OutputFile>
//!   <Include File="css/reset.css" />
//!   <Include File="theme.less">
//!     <OutputFile>t.min.css</OutputFile>
//!   </Include>
//!   <Bundle File="widgets/widgets.bundle" />
//! </Bundle>
//! ```
//!
//! Attributes on the root element (namespace declarations from older tools)
//! are ignored.

use serde::{Deserialize, Serialize};

use super::{Entry, Include};

pub(super) const DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "Bundle")]
pub(super) struct BundleXml {
    #[serde(rename = "$value", default)]
    pub children: Vec<Child>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) enum Child {
    OutputFile(String),
    Include(IncludeXml),
    Bundle(IncludeXml),
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct IncludeXml {
    #[serde(rename = "@File", default)]
    pub file: String,

    #[serde(
        rename = "OutputFile",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub output_file: Option<String>,
}

impl From<&Include> for IncludeXml {
    fn from(include: &Include) -> Self {
        Self {
            file: include.file.clone(),
            output_file: include.output_file.clone(),
        }
    }
}

impl IncludeXml {
    pub fn into_include(self) -> Result<Include, String> {
        if self.file.trim().is_empty() {
            return Err("entry without a `File` attribute".to_owned());
        }
        Ok(Include {
            file: self.file,
            output_file: self.output_file.filter(|o| !o.trim().is_empty()),
        })
    }
}

impl From<&Entry> for Child {
    fn from(entry: &Entry) -> Self {
        match entry {
            Entry::Include(include) => Self::Include(include.into()),
            Entry::Bundle(include) => Self::Bundle(include.into()),
        }
    }
}

pub(super) fn parse(xml: &str) -> Result<BundleXml, String> {
    quick_xml::de::from_str(xml).map_err(|e| e.to_string())
}

pub(super) fn write(bundle: &BundleXml) -> Result<String, String> {
    let mut body = String::new();
    let mut ser = quick_xml::se::Serializer::new(&mut body);
    ser.indent(' ', 2);
    bundle.serialize(ser).map_err(|e| e.to_string())?;
    Ok(format!("{DECLARATION}\n{body}\n"))
}
