//! The SQL/DB bridge: prepared statements and result sets addressed by
//! small integer handles over the `host-ipc` frame wire (spec §4.10),
//! grounded on `original_source/contract/db_module.c` and the teacher's
//! `StorageIterator`/`create_storage_iterator`/`iterator_next`/
//! `dispose_iterator` resource-table pattern in `ApplicationEngine`.

use crate::error::{ContractError, Result};
use host_bignum::Bignum;
use host_ipc::{FrameReader, FrameWriter, Item};
use std::collections::HashMap;

pub type StatementId = u32;
pub type ResultSetId = u32;

/// A prepared statement awaiting parameter binding and execution.
pub struct PreparedStatement {
    pub query: String,
    pub params: FrameWriter,
}

impl PreparedStatement {
    fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), params: FrameWriter::new() }
    }
}

/// A materialized result set, addressed row-by-row through a cursor —
/// mirroring the teacher's `StorageIterator::next`/`value` pair.
pub struct ResultSet {
    rows: Vec<FrameReader>,
    cursor: usize,
}

impl ResultSet {
    pub fn new(rows: Vec<Vec<u8>>) -> Result<Self> {
        let parsed = rows
            .iter()
            .map(|row| FrameReader::parse(row).map_err(|e| ContractError::catchable(e.to_string())))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rows: parsed, cursor: 0 })
    }

    pub fn next(&mut self) -> bool {
        if self.cursor < self.rows.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    pub fn current_row(&self) -> Option<&FrameReader> {
        if self.cursor == 0 {
            return None;
        }
        self.rows.get(self.cursor - 1)
    }

    pub fn remaining(&self) -> usize {
        self.rows.len().saturating_sub(self.cursor)
    }
}

/// Per-service-context table of open statements/result sets, the DB-bridge
/// analogue of the engine's storage-iterator table (spec §3 supplement).
#[derive(Default)]
pub struct DbBridge {
    statements: HashMap<StatementId, PreparedStatement>,
    result_sets: HashMap<ResultSetId, ResultSet>,
    next_statement_id: StatementId,
    next_result_set_id: ResultSetId,
    read_only: bool,
}

impl DbBridge {
    pub fn new(read_only: bool) -> Self {
        Self { read_only, ..Default::default() }
    }

    pub fn prepare(&mut self, query: impl Into<String>) -> StatementId {
        let id = self.next_statement_id;
        self.next_statement_id += 1;
        self.statements.insert(id, PreparedStatement::new(query));
        id
    }

    pub fn bind(&mut self, statement: StatementId, item: Item) -> Result<()> {
        let stmt = self.statements.get_mut(&statement).ok_or(ContractError::UnknownStatement(statement))?;
        match item {
            Item::Str(s) => {
                stmt.params.add_string(s);
            }
            Item::Int(i) => {
                stmt.params.add_int(i);
            }
            Item::Long(l) => {
                stmt.params.add_long(l);
            }
            Item::Double(d) => {
                stmt.params.add_double(d);
            }
            Item::Bool(b) => {
                stmt.params.add_bool(b);
            }
            Item::Bignum(l) => {
                stmt.params.add_bignum(l);
            }
            Item::Null => {
                stmt.params.add_null();
            }
        }
        Ok(())
    }

    /// Binds a bignum parameter, rejecting values whose magnitude needs
    /// more than 63 bits (spec §4.9).
    pub fn bind_bignum(&mut self, statement: StatementId, value: &Bignum) -> Result<()> {
        let narrowed = value.to_i64().ok_or_else(|| ContractError::catchable("bignum parameter exceeds 63 bits"))?;
        self.bind(statement, Item::Bignum(narrowed))
    }

    /// Registers a materialized result set returned by the node's query
    /// executor, rejecting mutating statements against a read-only/view
    /// snapshot (spec §6).
    pub fn open_result_set(&mut self, statement: StatementId, is_write: bool, rows: Vec<Vec<u8>>) -> Result<ResultSetId> {
        if !self.statements.contains_key(&statement) {
            return Err(ContractError::UnknownStatement(statement));
        }
        if is_write && self.read_only {
            return Err(ContractError::ReadOnlySnapshot);
        }
        let id = self.next_result_set_id;
        self.next_result_set_id += 1;
        self.result_sets.insert(id, ResultSet::new(rows)?);
        Ok(id)
    }

    pub fn result_set_mut(&mut self, id: ResultSetId) -> Result<&mut ResultSet> {
        self.result_sets.get_mut(&id).ok_or(ContractError::UnknownResultSet(id))
    }

    pub fn close_statement(&mut self, id: StatementId) {
        self.statements.remove(&id);
    }

    pub fn close_result_set(&mut self, id: ResultSetId) {
        self.result_sets.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> Vec<u8> {
        let mut w = FrameWriter::new();
        w.add_string("alice").add_int(30);
        w.finish()
    }

    #[test]
    fn prepare_bind_and_iterate_result_set() {
        let mut bridge = DbBridge::new(false);
        let stmt = bridge.prepare("select name, age from users where id = ?");
        bridge.bind(stmt, Item::Int(1)).unwrap();

        let rs = bridge.open_result_set(stmt, false, vec![sample_row()]).unwrap();
        let result_set = bridge.result_set_mut(rs).unwrap();
        assert_eq!(result_set.remaining(), 1);
        assert!(result_set.next());
        let row = result_set.current_row().unwrap();
        assert_eq!(row.get_string(0).unwrap(), "alice");
        assert_eq!(row.get_int(1).unwrap(), 30);
        assert!(!result_set.next());
    }

    #[test]
    fn read_only_snapshot_rejects_write() {
        let mut bridge = DbBridge::new(true);
        let stmt = bridge.prepare("insert into users values (?)");
        let err = bridge.open_result_set(stmt, true, vec![]).unwrap_err();
        assert_eq!(err, ContractError::ReadOnlySnapshot);
    }

    #[test]
    fn unknown_statement_errors() {
        let mut bridge = DbBridge::new(false);
        let err = bridge.bind(99, Item::Null).unwrap_err();
        assert_eq!(err, ContractError::UnknownStatement(99));
    }

    #[test]
    fn bignum_param_binds_when_in_range() {
        let mut bridge = DbBridge::new(false);
        let stmt = bridge.prepare("insert into ledger values (?)");
        bridge.bind_bignum(stmt, &Bignum::from_i64(42)).unwrap();
    }

    #[test]
    fn bignum_param_rejected_over_63_bits() {
        let mut bridge = DbBridge::new(false);
        let stmt = bridge.prepare("insert into ledger values (?)");
        let huge = Bignum::max_value();
        assert!(bridge.bind_bignum(stmt, &huge).is_err());
    }
}
