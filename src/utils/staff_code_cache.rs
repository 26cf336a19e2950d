use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

/// true  => staff code is ISSUED
/// false => staff code is AVAILABLE (usually we store only issued)
pub static STAFF_CODE_CACHE: Lazy<Cache<String, bool>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(500_000) // tune based on memory
        .time_to_live(Duration::from_secs(86400)) // 24h TTL
        .build()
});

/// Mark a single staff code as issued
pub async fn mark_issued(staff_code: &str) {
    STAFF_CODE_CACHE
        .insert(staff_code.trim().to_uppercase(), true)
        .await;
}

/// Check if a staff code is already issued
pub async fn is_issued(staff_code: &str) -> bool {
    STAFF_CODE_CACHE
        .get(&staff_code.trim().to_uppercase())
        .await
        .unwrap_or(false)
}

/// Batch mark staff codes as issued
async fn batch_mark(staff_codes: &[String]) {
    let futures: Vec<_> = staff_codes
        .iter()
        .map(|c| STAFF_CODE_CACHE.insert(c.trim().to_uppercase(), true))
        .collect();

    // Await all insertions concurrently
    futures::future::join_all(futures).await;
}

/// Load staff codes of officers hired recently into the in-memory cache
/// (batched); bulk onboarding mostly collides with recent issues.
pub async fn warmup_staff_code_cache(
    pool: &MySqlPool,
    days: u32,
    batch_size: usize,
) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (String,)>(
        r#"
        SELECT staff_code
        FROM officers
        WHERE join_date >= CURDATE() - INTERVAL ? DAY
        ORDER BY join_date DESC
        "#,
    )
    .bind(days)
    .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total_count = 0usize;

    while let Some(row) = stream.next().await {
        let (staff_code,) = row?;
        batch.push(staff_code);
        total_count += 1;

        if batch.len() >= batch_size {
            batch_mark(&batch).await;
            batch.clear();
        }
    }

    // Insert any remaining codes
    if !batch.is_empty() {
        batch_mark(&batch).await;
    }

    log::info!(
        "Staff code cache warmup complete: {} officers (last {} days)",
        total_count,
        days
    );

    Ok(())
}
