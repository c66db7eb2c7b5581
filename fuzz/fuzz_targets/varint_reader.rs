#![no_main]
use kafka_cluster_meta::varint::{read_unsigned_varint, read_varint, read_varlong};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    read_varint(&mut &data[..]).ok();
    read_varlong(&mut &data[..]).ok();
    read_unsigned_varint(&mut &data[..]).ok();
});
