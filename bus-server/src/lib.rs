//! Bus arrival server.
//!
//! A web service that answers: "when is the next bus at this stop?" from a
//! GTFS-Realtime trip updates feed.

pub mod config;
pub mod domain;
pub mod feed;
pub mod reference;
pub mod resolve;
pub mod web;

pub mod gtfs_rt {
    include!(concat!(env!("OUT_DIR"), "/transit_realtime.rs"));
}
