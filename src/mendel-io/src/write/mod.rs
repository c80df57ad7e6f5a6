mod generic_writer;
pub use generic_writer::{GenericWriter, WriterError, WRITER_SEPARATOR};

mod distribution;
pub use distribution::{DistributionRow, DistributionHeader};
