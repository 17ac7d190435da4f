pub mod entity;
pub mod http;
pub mod output;
pub mod parser;
pub mod publisher;
pub mod summary;
pub mod textfmt;
pub mod topic;

pub mod gtfs_rt {
    include!(concat!(env!("OUT_DIR"), "/transit_realtime.rs"));
}
