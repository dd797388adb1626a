//! Common layouts and grid shapes for restart codec tests.

/// Field orderings.
pub mod layouts {
    /// Kinematic and thermodynamic fields of a CM1 restart dump.
    pub const CM1_UVWTH: [&str; 4] = ["u", "v", "w", "th"];

    /// Two-field layout used by small end-to-end checks.
    pub const UV: [&str; 2] = ["u", "v"];

    /// Single-field layout.
    pub const THETA_ONLY: [&str; 1] = ["th"];
}

/// Grid dimensions as `(nx, ny, nz)`.
pub mod shapes {
    /// Full TOKC warm-bubble domain.
    pub const CM1_TOKC: (usize, usize, usize) = (1700, 1700, 121);

    /// Smallest grid where every axis is distinguishable.
    pub const CUBE_2: (usize, usize, usize) = (2, 2, 2);

    /// One column with two levels.
    pub const COLUMN_2: (usize, usize, usize) = (1, 1, 2);

    /// Unequal dimensions, catches transposed axes.
    pub const SKEWED: (usize, usize, usize) = (3, 4, 5);

    /// Number of points in a shape.
    pub fn len(shape: (usize, usize, usize)) -> usize {
        shape.0 * shape.1 * shape.2
    }
}
