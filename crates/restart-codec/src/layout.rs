//! Field layout descriptors.
//!
//! Restart files carry no header, so the order of the variables and their
//! count have to be supplied out of band. A [`FieldLayout`] records that
//! order; every field occupies one contiguous block of `nx*ny*nz` values.

use serde::{Deserialize, Serialize};

use crate::error::{RestartError, Result};
use crate::grid::GridShape;

/// Ordered, duplicate-free list of field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FieldLayout {
    names: Vec<String>,
}

impl FieldLayout {
    /// Create a layout from names in on-disk order.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();

        if names.is_empty() {
            return Err(RestartError::InvalidLayout(
                "layout must declare at least one field".to_string(),
            ));
        }

        for (i, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(RestartError::InvalidLayout(format!(
                    "field {} has an empty name",
                    i
                )));
            }
            if names[..i].contains(name) {
                return Err(RestartError::DuplicateField(name.clone()));
            }
        }

        Ok(Self { names })
    }

    /// The `u, v, w, th` ordering assumed for CM1 restart dumps.
    pub fn cm1_uvwth() -> Self {
        Self {
            names: ["u", "v", "w", "th"].iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Parse a comma-separated list such as `"u,v,w,th"`.
    pub fn parse(s: &str) -> Result<Self> {
        Self::new(s.split(',').map(str::trim).filter(|n| !n.is_empty()))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Position of `name` in declaration order.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| RestartError::unknown_field(name))
    }

    /// Elements occupied by one field.
    pub fn block_len(&self, shape: &GridShape) -> usize {
        shape.len()
    }

    /// Elements occupied by the whole file.
    ///
    /// Fails with `InvalidShape` when the file would not be addressable in
    /// bytes on this platform.
    pub fn total_elements(&self, shape: &GridShape) -> Result<usize> {
        self.names
            .len()
            .checked_mul(shape.len())
            .filter(|n| n.checked_mul(crate::reader::ELEMENT_WIDTH).is_some())
            .ok_or_else(|| {
                RestartError::InvalidShape(format!(
                    "{} fields of {} overflow addressable size",
                    self.names.len(),
                    shape
                ))
            })
    }

    /// Element offset of the first value of `name` in the flat buffer.
    pub fn offset_of(&self, name: &str, shape: &GridShape) -> Result<usize> {
        let index = self.index_of(name)?;
        self.total_elements(shape)?;
        Ok(index * shape.len())
    }

    /// Expected file size in bytes.
    pub fn expected_bytes(&self, shape: &GridShape) -> Result<u64> {
        let elements = self.total_elements(shape)?;
        Ok((elements * crate::reader::ELEMENT_WIDTH) as u64)
    }

    /// Iterate `(name, offset)` pairs in declaration order.
    ///
    /// Offsets are only meaningful once `total_elements` has succeeded.
    pub fn blocks<'a>(&'a self, shape: &GridShape) -> impl Iterator<Item = (&'a str, usize)> + 'a {
        let block = shape.len();
        self.names
            .iter()
            .enumerate()
            .map(move |(i, name)| (name.as_str(), i * block))
    }
}

impl TryFrom<Vec<String>> for FieldLayout {
    type Error = RestartError;

    fn try_from(names: Vec<String>) -> Result<Self> {
        Self::new(names)
    }
}

impl From<FieldLayout> for Vec<String> {
    fn from(layout: FieldLayout) -> Self {
        layout.names
    }
}

impl std::fmt::Display for FieldLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.names.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uvwth() -> FieldLayout {
        FieldLayout::new(["u", "v", "w", "th"]).unwrap()
    }

    #[test]
    fn test_offset_of() {
        let layout = uvwth();
        let shape = GridShape::new(2, 2, 2).unwrap();
        assert_eq!(layout.offset_of("u", &shape).unwrap(), 0);
        assert_eq!(layout.offset_of("v", &shape).unwrap(), 8);
        assert_eq!(layout.offset_of("w", &shape).unwrap(), 16);
        assert_eq!(layout.offset_of("th", &shape).unwrap(), 24);
    }

    #[test]
    fn test_total_elements() {
        let layout = uvwth();
        let shape = GridShape::new(1700, 1700, 121).unwrap();
        assert_eq!(layout.total_elements(&shape).unwrap(), 4 * 1700 * 1700 * 121);
        assert_eq!(
            layout.expected_bytes(&shape).unwrap(),
            16 * 1700 * 1700 * 121_u64
        );
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_total_size_overflow_is_error() {
        // One field of this shape is addressable; four are not.
        let shape = GridShape::new(1 << 20, 1 << 20, 1 << 20).unwrap();
        let layout = FieldLayout::cm1_uvwth();
        assert!(matches!(
            layout.total_elements(&shape),
            Err(RestartError::InvalidShape(_))
        ));
        assert!(layout.expected_bytes(&shape).is_err());
        assert!(FieldLayout::new(["th"]).unwrap().expected_bytes(&shape).is_ok());
    }

    #[test]
    fn test_unknown_field() {
        let shape = GridShape::new(2, 2, 2).unwrap();
        match uvwth().offset_of("qv", &shape) {
            Err(RestartError::UnknownField(name)) => assert_eq!(name, "qv"),
            other => panic!("expected UnknownField, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_rejected() {
        assert!(matches!(
            FieldLayout::new(["u", "v", "u"]),
            Err(RestartError::DuplicateField(name)) if name == "u"
        ));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            FieldLayout::new(Vec::<String>::new()),
            Err(RestartError::InvalidLayout(_))
        ));
        assert!(FieldLayout::new(["u", ""]).is_err());
    }

    #[test]
    fn test_parse_and_display() {
        let layout = FieldLayout::parse("u, v ,w,th").unwrap();
        assert_eq!(layout, uvwth());
        assert_eq!(layout.to_string(), "u,v,w,th");
        assert_eq!(FieldLayout::cm1_uvwth(), uvwth());
    }

    #[test]
    fn test_blocks() {
        let shape = GridShape::new(1, 1, 2).unwrap();
        let layout = FieldLayout::new(["u", "v"]).unwrap();
        let blocks: Vec<_> = layout.blocks(&shape).collect();
        assert_eq!(blocks, vec![("u", 0), ("v", 2)]);
    }
}
