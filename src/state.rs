use crate::{
    db::{DbPool, OrmConn, orm_from_pool},
    session::SessionKeys,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub sessions: SessionKeys,
}

impl AppState {
    pub fn new(pool: DbPool, sessions: SessionKeys) -> Self {
        let orm = orm_from_pool(&pool);
        Self {
            pool,
            orm,
            sessions,
        }
    }
}
