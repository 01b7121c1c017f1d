use autoani_database::Database;
use autoani_domain::config::ApiConfig;
use autoani_domain::registry::InitializedSlice;
use autoani_kernel::server::{ApiState, ApiStateError};

#[autoani_derive::autoani_slice]
pub struct Greeter {
    pub greeting: String,
}

#[tokio::test]
async fn builder_requires_config_and_database() {
    let err = ApiState::builder().build().unwrap_err();
    assert!(matches!(err, ApiStateError::Validation { .. }));

    let err = ApiState::builder().config(ApiConfig::default()).build().unwrap_err();
    assert!(matches!(err, ApiStateError::Validation { .. }));
}

#[tokio::test]
async fn registered_slices_are_retrievable() {
    let db = Database::builder().url("mem://").session("test", "state").init().await.unwrap();
    let greeter = Greeter::new(GreeterInner { greeting: "Mirë se vini".to_owned() });

    let state = ApiState::builder()
        .config(ApiConfig::default())
        .db(db)
        .register_slice(InitializedSlice::new(greeter))
        .build()
        .unwrap();

    assert_eq!(state.slice_count(), 1);
    assert_eq!(state.try_get_slice::<Greeter>().unwrap().greeting, "Mirë se vini");
    assert_eq!(state.config.server.port, 5000);
}
