pub mod raw_block;
