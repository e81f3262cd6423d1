pub mod broadnet;
