use super::test_helpers::*;
use super::*;

use crate::error::AnalysisError;
use crate::types::{HistoryStatus, MediaType, MetadataSource};
use std::sync::atomic::Ordering;
use std::time::Duration;

mod analysis;
