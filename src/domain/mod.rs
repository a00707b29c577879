/// Domain layer
///
/// Filesystem entries, manifests, namespace identifiers, the apply plan and
/// the run report. No I/O happens here.
pub mod entities;
pub mod value_objects;
