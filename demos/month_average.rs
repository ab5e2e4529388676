use cinder_deposit::core::ingest::{read_table, ColumnMapping, Encoding};
use cinder_refinery::config::refinery_config::RefineryConfig;
use cinder_refinery::framework::refinery::Refinery;
use std::sync::Arc;

const FIRES: &str = "year,state,month,number\n\
    1998,Acre,Janeiro,0\n\
    1999,Acre,Janeiro,12\n\
    1998,Amapa,Julho,30\n\
    1999,Amapa,Julho,51\n\
    1998,Bahia,Agosto,120\n\
    1999,Bahia,Setembro,96\n";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // describe which columns hold the key and the measure
    let mapping = ColumnMapping::new("month", "number");
    let table = read_table(FIRES.as_bytes(), &mapping, Encoding::Utf8)?;

    // create a refinery with four map workers
    let refinery = Refinery::new(RefineryConfig::default())?.with_workers(4)?;

    // map/reduce the table and check it against the single-pass aggregation
    let result = refinery.assay(Arc::new(table)).await?;

    for (month, mean) in result.ranked() {
        println!("{}: {:.2}", month, mean);
    }
    Ok(())
}
