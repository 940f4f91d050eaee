//! Backend commands queued from UI to backend worker.

use shared::protocol::GenerationRequest;

pub enum BackendCommand {
    SubmitGeneration { request: GenerationRequest },
}
