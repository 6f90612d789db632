use super::*;

mod common;

mod cycles;
mod dependency_management;

pub(super) use common::{raw_pom, resolver_with, resolver_with_context, MapDownloader};
