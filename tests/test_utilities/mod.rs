/// Mock implementations shared by the integration tests
pub mod mocks;
