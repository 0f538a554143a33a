use crate::domain::entities::column::{resolve_property_name, ColumnMetadataMap};
use crate::domain::entities::sorting::{ColumnSort, OrderBy, SortDirection};

/// Server-side ordering for the primary sort key. The remote protocol takes a
/// single key, so everything after the first entry stays client-side.
pub fn build_sort_expression(
    sorting: &[ColumnSort],
    metadata: &ColumnMetadataMap,
) -> Option<Vec<OrderBy>> {
    let primary = sorting.first()?;
    let property = resolve_property_name(metadata.get(&primary.id), &primary.id);
    let direction = if primary.desc {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };

    Some(vec![OrderBy {
        property: property.to_string(),
        direction,
    }])
}
