/// Bidirectional mapping between two coordinate spaces.
pub trait Projection {
    /// Source point type.
    type InPoint;
    /// Target point type.
    type OutPoint;

    /// Maps a point forward. `None` if the point is outside the projection domain.
    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint>;
    /// Maps a point back. `None` if the point is outside the projection domain.
    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint>;
}
