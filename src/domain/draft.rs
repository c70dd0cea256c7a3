use std::collections::HashMap;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::errors::{DraftError, SubmissionError};
use super::order::{build_submission, Order, SubmissionContext};
use super::product::Product;
use super::reconciler::{self, EditKind, OrderLine, Step};

/// An order being built against one store's catalog.
///
/// Every order-entry screen drives the same draft, so quantity handling
/// cannot drift between them.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    context: SubmissionContext,
    catalog: HashMap<Uuid, Product>,
    lines: Vec<OrderLine>,
}

impl OrderDraft {
    pub fn new(context: SubmissionContext, catalog: Vec<Product>) -> Self {
        Self {
            context,
            catalog: catalog.into_iter().map(|p| (p.id, p)).collect(),
            lines: Vec::new(),
        }
    }

    /// Start a draft with one zero line for every catalog product, in catalog order.
    pub fn preloaded(context: SubmissionContext, catalog: Vec<Product>) -> Self {
        let lines = catalog.iter().map(|p| OrderLine::new(p.id)).collect();
        let mut draft = Self::new(context, catalog);
        draft.lines = lines;
        draft
    }

    pub fn context(&self) -> SubmissionContext {
        self.context
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn product(&self, id: &Uuid) -> Option<&Product> {
        self.catalog.get(id)
    }

    /// Add a line for `product_id`, returning its index.
    pub fn add_line(&mut self, product_id: Uuid) -> Result<usize, DraftError> {
        if !self.catalog.contains_key(&product_id) {
            return Err(DraftError::UnknownProduct(product_id));
        }
        if self.lines.iter().any(|l| l.product_id == product_id) {
            return Err(DraftError::DuplicateProduct(product_id));
        }
        self.lines.push(OrderLine::new(product_id));
        Ok(self.lines.len() - 1)
    }

    pub fn remove_line(&mut self, index: usize) -> Result<OrderLine, DraftError> {
        if index >= self.lines.len() {
            return Err(DraftError::NoSuchLine(index));
        }
        Ok(self.lines.remove(index))
    }

    pub fn edit(&mut self, index: usize, kind: EditKind, raw: &str) -> Result<&OrderLine, DraftError> {
        self.update(index, |line, product| {
            reconciler::apply_edit(line, product, kind, raw)
        })
    }

    pub fn step(&mut self, index: usize, kind: EditKind, step: Step) -> Result<&OrderLine, DraftError> {
        self.update(index, |line, product| {
            reconciler::step(line, product, kind, step)
        })
    }

    pub fn grand_total(&self) -> BigDecimal {
        reconciler::recompute_grand_total(&self.lines)
    }

    pub fn submission(&self) -> Result<Order, SubmissionError> {
        build_submission(&self.lines, self.context)
    }

    fn update<F>(&mut self, index: usize, f: F) -> Result<&OrderLine, DraftError>
    where
        F: FnOnce(&OrderLine, &Product) -> OrderLine,
    {
        let line = self
            .lines
            .get_mut(index)
            .ok_or(DraftError::NoSuchLine(index))?;
        let product = self
            .catalog
            .get(&line.product_id)
            .ok_or(DraftError::UnknownProduct(line.product_id))?;
        *line = f(line, product);
        Ok(&*line)
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;

    fn product(rate: i64, pack_size: Option<u32>) -> Product {
        Product {
            id: Uuid::new_v4(),
            seller_id: Uuid::new_v4(),
            name: "Tea".to_string(),
            rate: BigDecimal::from(rate),
            mrp: BigDecimal::from(rate),
            pack_size: pack_size.and_then(NonZeroU32::new),
        }
    }

    fn context() -> SubmissionContext {
        SubmissionContext {
            from_business: Uuid::new_v4(),
            to_business: Uuid::new_v4(),
            placed_by: Uuid::new_v4(),
        }
    }

    #[test]
    fn duplicate_selection_blocks_only_that_line() {
        let tea = product(10, Some(12));
        let sugar = product(5, None);
        let mut draft = OrderDraft::new(context(), vec![tea.clone(), sugar.clone()]);

        assert_eq!(draft.add_line(tea.id), Ok(0));
        assert_eq!(
            draft.add_line(tea.id),
            Err(DraftError::DuplicateProduct(tea.id))
        );
        assert_eq!(draft.add_line(sugar.id), Ok(1));
        assert_eq!(draft.lines().len(), 2);
    }

    #[test]
    fn unknown_product_is_rejected() {
        let mut draft = OrderDraft::new(context(), vec![product(1, None)]);
        let stray = Uuid::new_v4();
        assert_eq!(draft.add_line(stray), Err(DraftError::UnknownProduct(stray)));
    }

    #[test]
    fn edits_flow_through_the_reconciler() {
        let tea = product(10, Some(12));
        let sugar = product(25, None);
        let mut draft = OrderDraft::preloaded(context(), vec![tea, sugar]);

        let line = draft.edit(0, EditKind::Pieces, "15").expect("line exists");
        assert_eq!((line.pieces, line.cartons), (3, 1));
        draft.edit(1, EditKind::Pieces, "4").expect("line exists");
        assert_eq!(draft.grand_total(), BigDecimal::from(250));

        let removed = draft.remove_line(1).expect("line exists");
        assert_eq!(removed.line_total, BigDecimal::from(100));
        assert_eq!(draft.grand_total(), BigDecimal::from(150));
    }

    #[test]
    fn step_buttons_use_the_same_rules() {
        let tea = product(1, Some(2));
        let mut draft = OrderDraft::preloaded(context(), vec![tea]);
        draft.step(0, EditKind::Pieces, Step::Increment).expect("line exists");
        let line = draft.step(0, EditKind::Pieces, Step::Increment).expect("line exists");
        assert_eq!((line.pieces, line.cartons), (0, 1));
    }

    #[test]
    fn missing_line_is_reported() {
        let mut draft = OrderDraft::new(context(), vec![]);
        assert_eq!(
            draft.edit(3, EditKind::Pieces, "1").err(),
            Some(DraftError::NoSuchLine(3))
        );
        assert_eq!(draft.remove_line(0).err(), Some(DraftError::NoSuchLine(0)));
    }

    #[test]
    fn preloaded_draft_with_no_quantity_cannot_be_submitted() {
        let draft = OrderDraft::preloaded(context(), vec![product(1, None), product(2, Some(3))]);
        assert_eq!(draft.submission(), Err(SubmissionError::EmptyOrder));
    }

    #[test]
    fn submission_carries_the_context() {
        let ctx = context();
        let tea = product(10, Some(12));
        let mut draft = OrderDraft::new(ctx, vec![tea.clone()]);
        let idx = draft.add_line(tea.id).expect("known product");
        draft.edit(idx, EditKind::Cartons, "2").expect("line exists");

        let order = draft.submission().expect("order builds");
        assert_eq!(order.placed_by, ctx.placed_by);
        assert_eq!(order.grand_total, BigDecimal::from(240));
        assert_eq!(order.items[0].cartons, 2);
    }
}
