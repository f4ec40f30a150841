use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Persisted bank statement. Immutable once inserted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct BankStatement {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content_hash: String,
    pub statement_date: Option<String>,
    pub contract_number: Option<String>,
    pub account_number: Option<String>,
    pub card: Option<String>,
    pub branch_of_the_bank: Option<String>,
    pub main_currency: Option<String>,
    pub period: Option<String>,
    pub client_name: Option<String>,
    pub transaction: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Statement record before the store assigns identity.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBankStatement {
    pub user_id: Uuid,
    pub content_hash: String,
    pub fields: StatementFields,
}

/// Named fields sliced out of a statement's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementField {
    StatementDate,
    ClientName,
    ContractNumber,
    AccountNumber,
    Card,
    BranchOfTheBank,
    MainCurrency,
    Period,
    Transaction,
}

impl StatementField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StatementDate => "statement_date",
            Self::ClientName => "client_name",
            Self::ContractNumber => "contract_number",
            Self::AccountNumber => "account_number",
            Self::Card => "card",
            Self::BranchOfTheBank => "branch_of_the_bank",
            Self::MainCurrency => "main_currency",
            Self::Period => "period",
            Self::Transaction => "transaction",
        }
    }
}

impl std::fmt::Display for StatementField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values extracted from one statement. Also the success payload of an upload.
///
/// Carries nine keys: the eight layout fields plus `statement_date` (line 0),
/// which earlier clients of the upload endpoint did not receive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementFields {
    pub contract_number: String,
    pub account_number: String,
    pub card: String,
    pub branch_of_the_bank: String,
    pub main_currency: String,
    pub period: String,
    pub client_name: String,
    pub transaction: String,
    pub statement_date: String,
}

impl StatementFields {
    pub fn set(&mut self, field: StatementField, value: String) {
        let slot = match field {
            StatementField::StatementDate => &mut self.statement_date,
            StatementField::ClientName => &mut self.client_name,
            StatementField::ContractNumber => &mut self.contract_number,
            StatementField::AccountNumber => &mut self.account_number,
            StatementField::Card => &mut self.card,
            StatementField::BranchOfTheBank => &mut self.branch_of_the_bank,
            StatementField::MainCurrency => &mut self.main_currency,
            StatementField::Period => &mut self.period,
            StatementField::Transaction => &mut self.transaction,
        };
        *slot = value;
    }

    pub fn get(&self, field: StatementField) -> &str {
        match field {
            StatementField::StatementDate => &self.statement_date,
            StatementField::ClientName => &self.client_name,
            StatementField::ContractNumber => &self.contract_number,
            StatementField::AccountNumber => &self.account_number,
            StatementField::Card => &self.card,
            StatementField::BranchOfTheBank => &self.branch_of_the_bank,
            StatementField::MainCurrency => &self.main_currency,
            StatementField::Period => &self.period,
            StatementField::Transaction => &self.transaction,
        }
    }
}

impl BankStatement {
    /// Materialize a new record with a fresh id, as the database default would.
    pub fn from_new(new: NewBankStatement) -> Self {
        let NewBankStatement {
            user_id,
            content_hash,
            fields,
        } = new;

        Self {
            id: Uuid::new_v4(),
            user_id,
            content_hash,
            statement_date: Some(fields.statement_date),
            contract_number: Some(fields.contract_number),
            account_number: Some(fields.account_number),
            card: Some(fields.card),
            branch_of_the_bank: Some(fields.branch_of_the_bank),
            main_currency: Some(fields.main_currency),
            period: Some(fields.period),
            client_name: Some(fields.client_name),
            transaction: Some(fields.transaction),
            created_at: Utc::now(),
        }
    }
}
