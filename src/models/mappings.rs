use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bidirectional mapping between raw (business-facing) IDs and the zero-based
/// internal indices used by the matrix and the model. One instance per entity
/// class (users, items). The reverse table is dense: position = index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdIndex {
    to_index: HashMap<String, usize>,
    from_index: Vec<String>,
}

impl IdIndex {
    pub fn new(to_index: HashMap<String, usize>, from_index: Vec<String>) -> Self {
        Self {
            to_index,
            from_index,
        }
    }

    /// The two tables must form a bijection: same cardinality, every forward
    /// entry round-trips through the reverse table.
    pub fn validate(&self) -> Result<()> {
        if self.to_index.len() != self.from_index.len() {
            return Err(anyhow!(
                "forward map has {} entries but reverse table has {}",
                self.to_index.len(),
                self.from_index.len()
            ));
        }

        for (id, &index) in &self.to_index {
            match self.from_index.get(index) {
                Some(reverse_id) if reverse_id == id => {}
                Some(reverse_id) => {
                    return Err(anyhow!(
                        "id {:?} maps to index {} but index maps back to {:?}",
                        id,
                        index,
                        reverse_id
                    ));
                }
                None => {
                    return Err(anyhow!(
                        "id {:?} maps to index {} beyond reverse table",
                        id,
                        index
                    ));
                }
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.from_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.from_index.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.to_index.get(id).copied()
    }

    pub fn id_of(&self, index: usize) -> Option<&str> {
        self.from_index.get(index).map(String::as_str)
    }

    /// Raw IDs in internal-index order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.from_index.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> IdIndex {
        let to_index = HashMap::from([
            ("u1".to_string(), 0),
            ("u2".to_string(), 1),
            ("u3".to_string(), 2),
        ]);
        let from_index = vec!["u1".to_string(), "u2".to_string(), "u3".to_string()];
        IdIndex::new(to_index, from_index)
    }

    #[test]
    fn test_round_trip() {
        let index = sample();
        assert!(index.validate().is_ok());
        assert_eq!(index.index_of("u2"), Some(1));
        assert_eq!(index.id_of(1), Some("u2"));
        assert_eq!(index.index_of("missing"), None);
        assert_eq!(index.id_of(3), None);
    }

    #[test]
    fn test_ids_in_index_order() {
        let index = sample();
        let ids: Vec<&str> = index.ids().collect();
        assert_eq!(ids, vec!["u1", "u2", "u3"]);
    }

    #[test]
    fn test_validate_rejects_mismatched_reverse() {
        let to_index = HashMap::from([("u1".to_string(), 0), ("u2".to_string(), 1)]);
        let from_index = vec!["u1".to_string(), "other".to_string()];
        let index = IdIndex::new(to_index, from_index);
        assert!(index.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_dangling_index() {
        let to_index = HashMap::from([("u1".to_string(), 5)]);
        let from_index = vec!["u1".to_string()];
        let index = IdIndex::new(to_index, from_index);
        assert!(index.validate().is_err());
    }
}
