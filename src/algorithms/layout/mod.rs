use crate::core::entities::VID;
use glam::Vec2;
use rustc_hash::FxHashMap;

pub mod fruchterman_reingold;

pub type NodeVectors = FxHashMap<VID, Vec2>;
