//! Serializable view of a [`MemberTable`] for source-to-source tooling.
//!
//! The manifest is purely syntactic: every address is computed from the table alone.

use serde::{Deserialize, Serialize};

use crate::member::{MemberTable, Owner};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerDescriptor {
  Global,
  Receiver,
  Member(u32),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDescriptor {
  pub id: u32,
  pub name: String,
  pub address: String,
  pub owner: OwnerDescriptor,
  #[serde(rename = "type")]
  pub ty: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub element: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingManifest {
  pub members: Vec<MemberDescriptor>,
}

impl BindingManifest {
  pub fn to_json(&self) -> serde_json::Result<String> {
    serde_json::to_string(self)
  }

  pub fn to_json_pretty(&self) -> serde_json::Result<String> {
    serde_json::to_string_pretty(self)
  }

  pub fn from_json(json: &str) -> serde_json::Result<Self> {
    serde_json::from_str(json)
  }

  pub fn find(&self, address: &str) -> Option<&MemberDescriptor> {
    self.members.iter().find(|m| m.address == address)
  }
}

impl MemberTable {
  pub fn manifest(&self) -> BindingManifest {
    let members = self
      .iter()
      .map(|(id, node)| MemberDescriptor {
        id: id.index() as u32,
        name: node.name().as_str().to_string(),
        // Ids come from this table, so the address always exists.
        address: self
          .address(id)
          .map(|a| a.to_string())
          .unwrap_or_default(),
        owner: match node.owner() {
          Owner::Global => OwnerDescriptor::Global,
          Owner::Receiver => OwnerDescriptor::Receiver,
          Owner::Member(q) => OwnerDescriptor::Member(q.index() as u32),
        },
        ty: node.ty().name().to_string(),
        element: node.element_binding().map(|e| e.element().name().to_string()),
      })
      .collect();
    BindingManifest { members }
  }
}
