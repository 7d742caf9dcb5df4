use super::model::{
    Condition, ConditionBlock, ConditionLimits, ConditionOperand, ConditionsInputValue,
    ExpressionType, ExpressionValue, LogicOperator, StructuredCondition,
};
use super::operator::FilterOperator;
use crate::id::{IdGenerator, UuidGenerator};
use tracing::debug;

/// Pure mutation API over [`ConditionsInputValue`].
///
/// Every operation takes the current value and returns a new one. Operations
/// that would break a bound (too many blocks, removing the last condition, an
/// out-of-range index) return the value unchanged; compare lengths if the
/// caller needs to tell the user. The `otherwise` id is filled in by the first
/// edit and never regenerated afterwards.
pub struct ConditionEditor<G = UuidGenerator> {
    ids: G,
    limits: ConditionLimits,
}

impl ConditionEditor<UuidGenerator> {
    pub fn new() -> Self {
        Self::with_id_generator(UuidGenerator)
    }
}

impl Default for ConditionEditor<UuidGenerator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: IdGenerator> ConditionEditor<G> {
    pub fn with_id_generator(ids: G) -> Self {
        Self {
            ids,
            limits: ConditionLimits::default(),
        }
    }

    pub fn limits(mut self, limits: ConditionLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn current_limits(&self) -> &ConditionLimits {
        &self.limits
    }

    /// A fresh value with a single structured block and a generated `otherwise` id.
    pub fn initial_value(&self) -> ConditionsInputValue {
        self.ensure_otherwise_id(&ConditionsInputValue {
            when: vec![self.new_block()],
            otherwise: Default::default(),
        })
    }

    /// Generates the `otherwise` id if it has not been generated yet.
    pub fn ensure_otherwise_id(&self, value: &ConditionsInputValue) -> ConditionsInputValue {
        let mut next = value.clone();
        if next.otherwise.id.is_empty() {
            next.otherwise.id = self.ids.generate();
        }
        next
    }

    /// `AND`, structured, one empty condition.
    pub fn new_block(&self) -> ConditionBlock {
        ConditionBlock {
            id: self.ids.generate(),
            logic_operator: LogicOperator::And,
            expression_type: ExpressionType::Condition,
            conditions: vec![self.empty_condition(&ExpressionType::Condition)],
        }
    }

    pub fn empty_condition(&self, expression_type: &ExpressionType) -> Condition {
        let expression_value = match expression_type {
            ExpressionType::Condition => ExpressionValue::Structured(StructuredCondition::default()),
            ExpressionType::Raw(_) => ExpressionValue::Raw(String::new()),
        };
        Condition {
            id: self.ids.generate(),
            expression_value: Some(expression_value),
            expression_description: None,
        }
    }

    pub fn can_add_block(&self, value: &ConditionsInputValue) -> bool {
        value.when.len() < self.limits.max_blocks
    }

    pub fn can_add_condition(&self, value: &ConditionsInputValue, block: usize) -> bool {
        value.when.get(block).is_some_and(|b| {
            !b.is_raw() && b.conditions.len() < self.limits.max_conditions
        })
    }

    pub fn add_block(&self, value: &ConditionsInputValue) -> ConditionsInputValue {
        let mut next = self.ensure_otherwise_id(value);
        if !self.can_add_block(value) {
            debug!(blocks = value.when.len(), "block limit reached, add_block ignored");
            return next;
        }
        next.when.push(self.new_block());
        next
    }

    pub fn remove_block(&self, value: &ConditionsInputValue, index: usize) -> ConditionsInputValue {
        let mut next = self.ensure_otherwise_id(value);
        if next.when.len() <= 1 || index >= next.when.len() {
            return next;
        }
        next.when.remove(index);
        next
    }

    /// Switches between structured and raw mode. Prior conditions are discarded
    /// since the two shapes cannot be converted into each other.
    pub fn toggle_expression_type(
        &self,
        value: &ConditionsInputValue,
        block: usize,
    ) -> ConditionsInputValue {
        self.edit_block(value, block, |b| {
            b.expression_type = b.expression_type.toggled(&self.limits.raw_language);
            b.conditions = vec![self.empty_condition(&b.expression_type)];
        })
    }

    pub fn toggle_logic_operator(
        &self,
        value: &ConditionsInputValue,
        block: usize,
    ) -> ConditionsInputValue {
        self.edit_block(value, block, |b| {
            b.logic_operator = b.logic_operator.toggled();
        })
    }

    /// Raw blocks always hold exactly one condition, so this is a no-op for them.
    pub fn add_condition(&self, value: &ConditionsInputValue, block: usize) -> ConditionsInputValue {
        if !self.can_add_condition(value, block) {
            return self.ensure_otherwise_id(value);
        }
        self.edit_block(value, block, |b| {
            b.conditions.push(self.empty_condition(&b.expression_type));
        })
    }

    pub fn remove_condition(
        &self,
        value: &ConditionsInputValue,
        block: usize,
        index: usize,
    ) -> ConditionsInputValue {
        self.edit_block(value, block, |b| {
            if b.conditions.len() > 1 && index < b.conditions.len() {
                b.conditions.remove(index);
            }
        })
    }

    /// Sets the operator of a structured condition. Choosing an emptiness check
    /// clears the value in the same edit.
    pub fn set_condition_operator(
        &self,
        value: &ConditionsInputValue,
        block: usize,
        condition: usize,
        operator: FilterOperator,
    ) -> ConditionsInputValue {
        self.edit_structured(value, block, condition, |s| s.with_operator(operator))
    }

    pub fn set_condition_key(
        &self,
        value: &ConditionsInputValue,
        block: usize,
        condition: usize,
        key: impl Into<String>,
    ) -> ConditionsInputValue {
        let key = key.into();
        self.edit_structured(value, block, condition, |mut s| {
            s.key = Some(key);
            s
        })
    }

    /// Ignored while an emptiness operator is selected.
    pub fn set_condition_value(
        &self,
        value: &ConditionsInputValue,
        block: usize,
        condition: usize,
        operand: ConditionOperand,
    ) -> ConditionsInputValue {
        self.edit_structured(value, block, condition, |mut s| {
            if s.takes_value() {
                s.value = Some(operand);
            }
            s
        })
    }

    /// Replaces the text of a raw block's single condition.
    pub fn set_raw_expression(
        &self,
        value: &ConditionsInputValue,
        block: usize,
        text: impl Into<String>,
        description: Option<String>,
    ) -> ConditionsInputValue {
        let text = text.into();
        self.edit_block(value, block, |b| {
            if !b.is_raw() {
                return;
            }
            if let Some(c) = b.conditions.first_mut() {
                c.expression_value = Some(ExpressionValue::Raw(text));
                c.expression_description = description;
            }
        })
    }

    fn edit_block(
        &self,
        value: &ConditionsInputValue,
        block: usize,
        edit: impl FnOnce(&mut ConditionBlock),
    ) -> ConditionsInputValue {
        let mut next = self.ensure_otherwise_id(value);
        if let Some(b) = next.when.get_mut(block) {
            edit(b);
        }
        next
    }

    fn edit_structured(
        &self,
        value: &ConditionsInputValue,
        block: usize,
        condition: usize,
        edit: impl FnOnce(StructuredCondition) -> StructuredCondition,
    ) -> ConditionsInputValue {
        self.edit_block(value, block, |b| {
            if b.is_raw() {
                return;
            }
            let Some(c) = b.conditions.get_mut(condition) else {
                return;
            };
            let current = match c.expression_value.take() {
                Some(ExpressionValue::Structured(s)) => s,
                Some(raw @ ExpressionValue::Raw(_)) => {
                    c.expression_value = Some(raw);
                    return;
                }
                None => StructuredCondition::default(),
            };
            c.expression_value = Some(ExpressionValue::Structured(edit(current)));
        })
    }
}
