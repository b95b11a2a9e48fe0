use crate::parse::Index;

/// Merge `overlay` into `base`, appending values.
///
/// Unlike a scalar overlay, a key present on both sides keeps all of its
/// values: `base`'s first, then `overlay`'s, in their original order.
pub fn append_values(base: &mut Index, overlay: &Index) {
    for (key, values) in overlay {
        base.entry(key.clone())
            .or_default()
            .extend(values.iter().cloned());
    }
}
