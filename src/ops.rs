mod explicit_batch;
mod graph_op;
mod implicit_batch;
mod invoke;
pub mod negotiation;

pub use explicit_batch::{ExplicitPoseNmsCreator, ExplicitPoseNmsOp, EXPLICIT_OPERATOR_NAME};
pub use graph_op::{ExecutionMode, GraphOperator, OperatorCreator};
pub use implicit_batch::{ImplicitPoseNmsCreator, ImplicitPoseNmsOp, IMPLICIT_OPERATOR_NAME};
