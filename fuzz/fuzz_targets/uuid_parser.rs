#![no_main]
use kafka_cluster_meta::Uuid;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(id) = data.parse::<Uuid>() {
        assert_eq!(id.to_string().parse::<Uuid>().ok(), Some(id));
    }
});
