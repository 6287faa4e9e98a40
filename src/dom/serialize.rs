//! HTML serialization of subtrees.

use kuchiki::NodeRef;

use crate::error::MailviewResult;

/// Serialize a node including its own tag
pub fn outer_html(node: &NodeRef) -> MailviewResult<String> {
    let mut bytes = Vec::new();
    node.serialize(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Serialize only the children of a node
pub fn inner_html(node: &NodeRef) -> MailviewResult<String> {
    let mut bytes = Vec::new();
    for child in node.children() {
        child.serialize(&mut bytes)?;
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
