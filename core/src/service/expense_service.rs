use std::collections::HashMap;

use anyhow::{anyhow, bail, Result};
use log::info;
use uuid::Uuid;

use crate::model::expense::{Expense, ExpenseType};
use crate::repository::ExpenseRepository;

pub struct ExpenseService<R: ExpenseRepository> {
    repo: R,
}

impl<R: ExpenseRepository> ExpenseService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn add_expense(&self, expense: Expense) -> Result<Expense> {
        if !(expense.amount.is_finite() && expense.amount > 0.0) {
            bail!("Enter a valid amount: {}", expense.amount);
        }
        let created = self.repo.create(expense)?;
        info!("Added {} expense {}", created.expense_type.label(), created.id);
        Ok(created)
    }

    pub fn get_expense(&self, id: &Uuid) -> Result<Expense> {
        self.repo
            .get(id)?
            .ok_or_else(|| anyhow!("Expense with ID {} not found", id))
    }

    pub fn delete_expense(&self, id: &Uuid) -> Result<()> {
        self.repo.delete(id)
    }

    /// Newest first.
    pub fn expenses_for_vehicle(&self, vehicle_id: &Uuid) -> Result<Vec<Expense>> {
        let mut expenses = self.repo.list_by_vehicle(vehicle_id)?;
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(expenses)
    }

    pub fn expenses_by_type(&self, expense_type: ExpenseType) -> Result<Vec<Expense>> {
        Ok(self
            .repo
            .list()?
            .into_iter()
            .filter(|e| e.expense_type == expense_type)
            .collect())
    }

    pub fn total_by_vehicle(&self, vehicle_id: &Uuid) -> Result<f64> {
        Ok(self.repo.list_by_vehicle(vehicle_id)?.iter().map(|e| e.amount).sum())
    }

    pub fn total_by_type(&self, expense_type: ExpenseType) -> Result<f64> {
        Ok(self.expenses_by_type(expense_type)?.iter().map(|e| e.amount).sum())
    }

    /// Per-type totals for one vehicle.
    pub fn breakdown(&self, vehicle_id: &Uuid) -> Result<HashMap<ExpenseType, f64>> {
        let mut totals = HashMap::new();
        for expense in self.repo.list_by_vehicle(vehicle_id)? {
            *totals.entry(expense.expense_type).or_insert(0.0) += expense.amount;
        }
        Ok(totals)
    }
}
