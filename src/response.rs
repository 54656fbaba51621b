use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct List<T> {
    list: Vec<T>,
    total: i64,
}

impl<T> List<T> {
    pub fn new(list: Vec<T>, total: i64) -> Self {
        List { list, total }
    }
}

impl<T> From<(Vec<T>, i64)> for List<T> {
    fn from((list, total): (Vec<T>, i64)) -> Self {
        List::new(list, total)
    }
}

#[derive(Debug, Serialize)]
pub struct CreateResponse {
    id: i32,
}

impl CreateResponse {
    pub fn new(id: i32) -> Self {
        CreateResponse { id }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    deleted: bool,
}

impl DeleteResponse {
    pub fn new() -> Self {
        DeleteResponse { deleted: true }
    }
}
