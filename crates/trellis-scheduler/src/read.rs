//! Point and range reads by index derivation.

use tracing::trace;
use trellis_cells::{Address, Cell, CellId, CellPath, ListKey};
use trellis_topology::locate;

use crate::backend::ListReader;
use crate::error::{Error, Result};

/// Read the element at zero-based `index`.
pub async fn read_element<R>(reader: &R, list: &ListKey, index: u64) -> Result<Address>
where
    R: ListReader + ?Sized,
{
    let mut elements = read_range(reader, list, index, 1).await?;
    elements
        .pop()
        .ok_or_else(|| Error::NotFound(format!("element {} of {}", index, list)))
}

/// Read up to `len` elements starting at zero-based `start`.
///
/// The range is clipped to the list's current length. Each leaf cell the
/// range touches is fetched once.
pub async fn read_range<R>(reader: &R, list: &ListKey, start: u64, len: u64) -> Result<Vec<Address>>
where
    R: ListReader + ?Sized,
{
    let total = reader.read_total_elements(&list.root_id()).await? as u64;
    let end = start.saturating_add(len).min(total);
    if start >= end {
        return Ok(Vec::new());
    }

    let mut out = Vec::with_capacity((end - start) as usize);
    let mut leaf: Option<(CellId, Cell)> = None;

    for index in start..end {
        let pos = locate(index).map_err(trellis_cells::CellError::from)?;
        let leaf_id = list.cell_id(&CellPath::leaf_of(pos));
        if leaf.as_ref().map(|(id, _)| *id) != Some(leaf_id) {
            trace!(list = %list, leaf = %leaf_id, "fetching leaf");
            leaf = Some((leaf_id, reader.read_cell(&leaf_id).await?));
        }

        let entry = leaf
            .as_ref()
            .and_then(|(_, cell)| cell.entries.get(pos.leaf as usize).copied())
            .ok_or_else(|| Error::NotFound(format!("element {} missing from leaf {}", index, leaf_id)))?;
        out.push(entry);
    }

    Ok(out)
}
