pub mod atlas_node;
