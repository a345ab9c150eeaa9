//! Perception: typed detections, frame filtering and board reconciliation

pub mod detection;
pub mod hand_gate;
pub mod reconciler;
pub mod scene;
pub mod stabilizer;

pub use detection::{BoundingBox, Detection, DetectorClass, Frame};
pub use hand_gate::HandGate;
pub use reconciler::{CellChange, HumanMove, ReconcileOutcome, ReconcileStats, SkipReason, reconcile};
pub use scene::{DEFAULT_MIN_CONFIDENCE, StoredPawn};
pub use stabilizer::FrameStabilizer;
