//! Minimal introspection model
//!
//! Only the shape needed at bootstrap: enough of the introspection document
//! to confirm the root object exists and see which interfaces and children it
//! declares. This is deliberately not a general D-Bus introspection parser.

use serde::Deserialize;

use crate::error::Result;

/// A method argument
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Arg {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@type", default)]
    pub ty: String,
    #[serde(rename = "@direction", default)]
    pub direction: String,
}

/// A method available on an interface
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Method {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "arg", default)]
    pub args: Vec<Arg>,
}

/// One interface declared by a remote object
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Interface {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "method", default)]
    pub methods: Vec<Method>,
}

/// A node in the remote object hierarchy
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Node {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "interface", default)]
    pub interfaces: Vec<Interface>,
    #[serde(rename = "node", default)]
    pub nodes: Vec<Node>,
}

impl Node {
    /// Whether this node declares the named interface
    pub fn has_interface(&self, name: &str) -> bool {
        self.interfaces.iter().any(|i| i.name == name)
    }
}

/// Parse an introspection XML document into a node tree
pub fn parse_node(xml: &str) -> Result<Node> {
    Ok(quick_xml::de::from_str(xml)?)
}
