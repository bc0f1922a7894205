//! Console output helpers.

use oleo_store::BusinessRecord;

/// Print a success line.
pub fn print_success(message: &str) {
    println!("✓ {message}");
}

/// Print an informational line.
pub fn print_info(message: &str) {
    println!("  {message}");
}

/// Print one record in key/value form.
pub fn print_record(record: &BusinessRecord) {
    println!("id:              {}", record.id);
    println!("role:            {}", record.role);
    println!("email:           {}", record.email);
    if let Some(name) = &record.display_name {
        println!("display name:    {name}");
    }
    println!("linkage status:  {}", record.linkage_status);
    println!(
        "auth identity:   {}",
        record.auth_identity_ref.as_deref().unwrap_or("-")
    );
    println!("attempts:        {}", record.linkage_attempts);
    if let Some(at) = record.last_attempt_at {
        println!("last attempt:    {}", at.to_rfc3339());
    }
    println!("active:          {}", record.active);
}

/// Print one record as a single summary line, for listings.
pub fn print_record_line(record: &BusinessRecord) {
    println!(
        "{}  {:<16} {:<18} {:<3} {}",
        record.id, record.role, record.linkage_status, record.linkage_attempts, record.email
    );
}
