use crate::errors::{AppError, AppResult};
use crate::models::{
    AttendanceRecord, Operator, Profile, RoleAssignment, Timestamp, UserId, UserSummary,
};
use crate::utils::time::{format_timestamp, parse_timestamp};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};
use std::collections::HashMap;

/// A user as stored by the local authority.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub profile: Profile,
    pub roles: RoleAssignment,
}

fn parse_ts_column(row: &Row, idx: &str) -> Result<Option<Timestamp>> {
    let raw: Option<String> = row.get(idx)?;
    match raw {
        None => Ok(None),
        Some(s) => parse_timestamp(&s).map(Some).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(AppError::InvalidTimestamp(s.clone())),
            )
        }),
    }
}

pub fn map_record_row(row: &Row) -> Result<AttendanceRecord> {
    Ok(AttendanceRecord {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        start_time: parse_ts_column(row, "start_time")?,
        end_time: parse_ts_column(row, "end_time")?,
    })
}

fn map_user_row(row: &Row) -> Result<UserRow> {
    let roles: String = row.get("roles")?;
    let admin: i64 = row.get("admin")?;
    Ok(UserRow {
        profile: Profile {
            user_id: row.get("user_id")?,
            user_name: row.get("user_name")?,
            legal_name: row.get("legal_name")?,
            nick_name: row.get("nick_name")?,
            dept_id: row.get("dept_id")?,
        },
        roles: RoleAssignment::new(
            admin != 0,
            roles
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect(),
        ),
    })
}

// ------------------------------------------------
// Users
// ------------------------------------------------

pub fn insert_user(conn: &Connection, profile: &Profile, roles: &RoleAssignment) -> AppResult<()> {
    conn.execute(
        "INSERT INTO users (user_id, user_name, legal_name, nick_name, dept_id, admin, roles)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            profile.user_id,
            profile.user_name,
            profile.legal_name,
            profile.nick_name,
            profile.dept_id,
            roles.admin as i64,
            roles.role_keys.join(","),
        ],
    )?;
    Ok(())
}

pub fn load_user(conn: &Connection, user_id: UserId) -> AppResult<Option<UserRow>> {
    let row = conn
        .query_row(
            "SELECT * FROM users WHERE user_id = ?1",
            [user_id],
            map_user_row,
        )
        .optional()?;
    Ok(row)
}

pub fn user_exists(conn: &Connection, user_id: UserId) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached("SELECT 1 FROM users WHERE user_id = ?1")?;
    Ok(stmt.exists([user_id])?)
}

pub fn list_users(conn: &Connection) -> AppResult<Vec<UserSummary>> {
    let mut stmt =
        conn.prepare("SELECT user_id, user_name, dept_id FROM users ORDER BY user_id ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok(UserSummary {
            user_id: row.get(0)?,
            user_name: row.get(1)?,
            dept_id: row.get(2)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ------------------------------------------------
// Attendance records
// ------------------------------------------------

pub fn last_record_for_user(conn: &Connection, user_id: UserId) -> AppResult<Option<AttendanceRecord>> {
    let rec = conn
        .query_row(
            "SELECT id, user_id, start_time, end_time FROM records
             WHERE user_id = ?1
             ORDER BY id DESC
             LIMIT 1",
            [user_id],
            map_record_row,
        )
        .optional()?;
    Ok(rec)
}

pub fn open_record_for_user(conn: &Connection, user_id: UserId) -> AppResult<Option<AttendanceRecord>> {
    let rec = conn
        .query_row(
            "SELECT id, user_id, start_time, end_time FROM records
             WHERE user_id = ?1 AND start_time IS NOT NULL AND end_time IS NULL
             ORDER BY id DESC
             LIMIT 1",
            [user_id],
            map_record_row,
        )
        .optional()?;
    Ok(rec)
}

pub fn insert_open_record(
    conn: &Connection,
    user_id: UserId,
    start: &Timestamp,
    operator: &Operator,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO records (user_id, start_time, end_time, operator_id, operator_name)
         VALUES (?1, ?2, NULL, ?3, ?4)",
        params![user_id, format_timestamp(start), operator.id, operator.name],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn close_record(
    conn: &Connection,
    record_id: i64,
    end: &Timestamp,
    operator: &Operator,
) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE records
         SET end_time = ?1, operator_id = ?2, operator_name = ?3
         WHERE id = ?4 AND end_time IS NULL",
        params![format_timestamp(end), operator.id, operator.name, record_id],
    )?;
    Ok(n)
}

/// Latest record of every user that has one.
pub fn latest_records(conn: &Connection) -> AppResult<Vec<AttendanceRecord>> {
    let mut stmt = conn.prepare(
        "SELECT r.id, r.user_id, r.start_time, r.end_time
         FROM records r
         JOIN (SELECT user_id, MAX(id) AS max_id FROM records GROUP BY user_id) last
           ON last.max_id = r.id
         ORDER BY r.user_id ASC",
    )?;
    let rows = stmt.query_map([], map_record_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Sum of closed-session minutes per user.
pub fn hours_summary(conn: &Connection) -> AppResult<HashMap<UserId, i64>> {
    let mut stmt = conn.prepare(
        "SELECT user_id,
                SUM(MAX(0, (CAST(strftime('%s', end_time) AS INTEGER)
                          - CAST(strftime('%s', start_time) AS INTEGER)) / 60))
         FROM records
         WHERE start_time IS NOT NULL AND end_time IS NOT NULL
         GROUP BY user_id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, UserId>(0)?, row.get::<_, Option<i64>>(1)?))
    })?;

    let mut out = HashMap::new();
    for r in rows {
        let (user_id, minutes) = r?;
        out.insert(user_id, minutes.unwrap_or(0).max(0));
    }
    Ok(out)
}
