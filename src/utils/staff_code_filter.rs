use anyhow::{Result, anyhow};
use autoscale_cuckoo_filter::CuckooFilter;
use futures::StreamExt;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::sync::RwLock;

/// Expected capacity and false-positive rate.
/// Tune these based on real officer headcounts.
const FILTER_CAPACITY: usize = 100_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

static STAFF_CODE_FILTER: Lazy<RwLock<CuckooFilter<String>>> =
    Lazy::new(|| RwLock::new(CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE)));

#[inline]
fn normalize(staff_code: &str) -> String {
    staff_code.trim().to_uppercase()
}

/// Check if a staff code might already be issued (false positives possible)
pub fn might_exist(staff_code: &str) -> bool {
    let staff_code = normalize(staff_code);
    STAFF_CODE_FILTER
        .read()
        .expect("staff code filter poisoned")
        .contains(&staff_code)
}

/// Insert a single staff code into the filter
pub fn insert(staff_code: &str) {
    let staff_code = normalize(staff_code);
    STAFF_CODE_FILTER
        .write()
        .expect("staff code filter poisoned")
        .add(&staff_code);
}

/// Remove a staff code from the filter
pub fn remove(staff_code: &str) {
    let staff_code = normalize(staff_code);
    STAFF_CODE_FILTER
        .write()
        .expect("staff code filter poisoned")
        .remove(&staff_code);
}

/// Warm up the staff code filter using streaming + batching
pub async fn warmup_staff_code_filter(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream =
        sqlx::query_as::<_, (String,)>("SELECT staff_code FROM officers").fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total = 0usize;

    while let Some(row) = stream.next().await {
        let (staff_code,) = row.map_err(|e| anyhow!("DB row fetch failed: {}", e))?;

        batch.push(normalize(&staff_code));
        total += 1;

        if batch.len() == batch_size {
            insert_batch(&batch);
            batch.clear();
        }
    }

    if !batch.is_empty() {
        insert_batch(&batch);
    }

    log::info!("Staff code filter warmup complete: {} officers", total);
    Ok(())
}

/// Insert a batch of normalized staff codes
fn insert_batch(staff_codes: &[String]) {
    let mut filter = STAFF_CODE_FILTER
        .write()
        .expect("staff code filter poisoned");

    for staff_code in staff_codes {
        filter.add(staff_code);
    }
}
