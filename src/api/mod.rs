pub mod energinet;
