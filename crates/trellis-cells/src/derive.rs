//! Cell address derivation.
//!
//! Seeds are absorbed in the order: path segments reversed (most specific
//! first) as decimal text, then the list id, then the authority. Root,
//! middle and leaf ids of one list therefore share a common seed suffix and
//! differ only in their prefix.
//!
//! Every seed is framed by its length. Plain concatenation is ambiguous:
//! leaf `(1, 2)` absorbs `"2" "1"` and middle `21` absorbs `"21"`.

use crate::error::Result;
use crate::identity::{Authority, ListId};
use crate::key::CellId;
use crate::path::CellPath;

/// Blake3 key-derivation context for cell ids.
const DERIVE_CONTEXT: &str = "trellis 2024-05-01 cell address v1";

/// Derive the id of the cell at `path` in the list `(authority, list)`.
pub fn derive_cell_id(authority: &Authority, list: &ListId, path: &CellPath) -> CellId {
    let mut hasher = blake3::Hasher::new_derive_key(DERIVE_CONTEXT);
    for segment in path.segments().iter().rev() {
        absorb(&mut hasher, segment.to_string().as_bytes());
    }
    absorb(&mut hasher, list.as_bytes());
    absorb(&mut hasher, authority.as_bytes());
    CellId(*hasher.finalize().as_bytes())
}

/// Derive a cell id from untyped path segments.
///
/// Fails with `InvalidPathSegment` for segments above 255 and `PathTooDeep`
/// for more than two segments.
pub fn derive_cell_id_from_segments(
    authority: &Authority,
    list: &ListId,
    segments: &[u32],
) -> Result<CellId> {
    let path = CellPath::from_segments(segments)?;
    Ok(derive_cell_id(authority, list, &path))
}

fn absorb(hasher: &mut blake3::Hasher, seed: &[u8]) {
    hasher.update(&(seed.len() as u32).to_le_bytes());
    hasher.update(seed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CellError;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn authority(byte: u8) -> Authority {
        Authority::from_bytes([byte; 32])
    }

    fn list(name: &str) -> ListId {
        ListId::new(name).unwrap()
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = derive_cell_id(&authority(1), &list("my_big_list"), &CellPath::leaf(0, 3));
        let b = derive_cell_id(&authority(1), &list("my_big_list"), &CellPath::leaf(0, 3));
        assert_eq!(a, b);
    }

    #[test]
    fn depths_do_not_collide() {
        let auth = authority(1);
        let id = list("my_big_list");
        let root = derive_cell_id(&auth, &id, &CellPath::root());
        let middle = derive_cell_id(&auth, &id, &CellPath::middle(0));
        let leaf = derive_cell_id(&auth, &id, &CellPath::leaf(0, 0));
        assert_ne!(root, middle);
        assert_ne!(middle, leaf);
        assert_ne!(root, leaf);
    }

    #[test]
    fn concatenated_segments_do_not_collide() {
        let auth = authority(1);
        let id = list("l");
        assert_ne!(
            derive_cell_id(&auth, &id, &CellPath::leaf(1, 2)),
            derive_cell_id(&auth, &id, &CellPath::middle(21))
        );
        // Segment digits must not bleed into the list id either.
        assert_ne!(
            derive_cell_id(&auth, &list("1l"), &CellPath::middle(2)),
            derive_cell_id(&auth, &list("l"), &CellPath::middle(21))
        );
    }

    #[test]
    fn segment_order_matters() {
        let auth = authority(1);
        let id = list("l");
        assert_ne!(
            derive_cell_id(&auth, &id, &CellPath::leaf(1, 2)),
            derive_cell_id(&auth, &id, &CellPath::leaf(2, 1))
        );
    }

    #[test]
    fn authority_and_list_separate_namespaces() {
        let path = CellPath::middle(0);
        assert_ne!(
            derive_cell_id(&authority(1), &list("a"), &path),
            derive_cell_id(&authority(2), &list("a"), &path)
        );
        assert_ne!(
            derive_cell_id(&authority(1), &list("a"), &path),
            derive_cell_id(&authority(1), &list("b"), &path)
        );
    }

    #[test]
    fn all_middle_and_leaf_ids_are_distinct() {
        let auth = authority(9);
        let id = list("distinct");
        let mut seen = HashSet::new();
        assert!(seen.insert(derive_cell_id(&auth, &id, &CellPath::root())));
        for j in 0..=255u8 {
            assert!(seen.insert(derive_cell_id(&auth, &id, &CellPath::middle(j))));
            for k in [0u8, 1, 12, 99, 255] {
                assert!(seen.insert(derive_cell_id(&auth, &id, &CellPath::leaf(j, k))));
            }
        }
    }

    #[test]
    fn untyped_segments_are_validated() {
        let auth = authority(1);
        let id = list("l");
        assert_eq!(
            derive_cell_id_from_segments(&auth, &id, &[3, 4]).unwrap(),
            derive_cell_id(&auth, &id, &CellPath::leaf(3, 4))
        );
        assert!(matches!(
            derive_cell_id_from_segments(&auth, &id, &[256]),
            Err(CellError::InvalidPathSegment { segment: 256 })
        ));
        assert!(matches!(
            derive_cell_id_from_segments(&auth, &id, &[1, 2, 3]),
            Err(CellError::PathTooDeep { depth: 3 })
        ));
    }

    proptest! {
        #[test]
        fn distinct_leaf_paths_give_distinct_ids(
            a in (0u8..=255, 0u8..=255),
            b in (0u8..=255, 0u8..=255),
        ) {
            prop_assume!(a != b);
            let auth = authority(3);
            let id = list("prop");
            prop_assert_ne!(
                derive_cell_id(&auth, &id, &CellPath::leaf(a.0, a.1)),
                derive_cell_id(&auth, &id, &CellPath::leaf(b.0, b.1))
            );
        }

        #[test]
        fn leaf_never_collides_with_middle(j in 0u8..=255, k in 0u8..=255, m in 0u8..=255) {
            let auth = authority(4);
            let id = list("prop");
            prop_assert_ne!(
                derive_cell_id(&auth, &id, &CellPath::leaf(j, k)),
                derive_cell_id(&auth, &id, &CellPath::middle(m))
            );
        }
    }
}
