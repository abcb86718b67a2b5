use serde::Serialize;

/// `{ "data": T }`, the body shape of every non-auth endpoint.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
