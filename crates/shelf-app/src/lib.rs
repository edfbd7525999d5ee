pub mod body;
pub mod error;
pub mod health;
pub mod rest_api;
pub mod state;

#[macro_export]
macro_rules! collection_from_state {
    ($entity:ty, $accessor:ident) => {
        impl $crate::state::Collection for $entity {
            fn repository(
                state: &$crate::state::AppState,
            ) -> &std::sync::RwLock<shelf_dal::Repository<Self>> {
                state.$accessor()
            }
        }
    };
}
