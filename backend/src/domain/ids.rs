use chrono::Utc;

/// Build an id from the current epoch millis, stepping forward until it is
/// not already taken.
pub fn unique_id<F>(generate: fn(u64) -> String, is_taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut millis = Utc::now().timestamp_millis() as u64;
    loop {
        let id = generate(millis);
        if !is_taken(&id) {
            return id;
        }
        millis += 1;
    }
}
