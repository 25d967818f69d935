//! Class, custom action and object definitions.

use words_ir::{Node, SharedNode};

use super::{Inherited, Interpreter};
use crate::class::CustomActionDefinition;
use crate::errors::{invalid_type, missing_context, EvalResult};
use crate::value::{Property, Value, ValueKind};

const IN_CLASS: &str = "a class definition";
const IN_ACTION: &str = "a custom action definition";
const IN_PROPERTY_LIST: &str = "an object creation or queued assignment";

impl Interpreter<'_> {
    pub(super) fn eval_create_class(
        &mut self,
        name: &str,
        parent: &str,
        body: Option<&SharedNode>,
    ) -> EvalResult {
        let class = self.env.create_class(name, parent)?;
        if let Some(body) = body {
            self.eval_with(body, Inherited::ClassBeingDefined(class))?;
        }
        Ok(Value::Nothing)
    }

    pub(super) fn eval_class_statements(
        &mut self,
        items: &[SharedNode],
        inherited: Inherited<'_>,
    ) -> EvalResult {
        let Inherited::ClassBeingDefined(class) = inherited else {
            return Err(missing_context("class statement list", IN_CLASS));
        };
        for item in items {
            self.eval_with(item, Inherited::ClassBeingDefined(class))?;
        }
        Ok(Value::Nothing)
    }

    pub(super) fn eval_define_property(
        &mut self,
        name: &str,
        value: &Node,
        inherited: Inherited<'_>,
    ) -> EvalResult {
        let Inherited::ClassBeingDefined(class) = inherited else {
            return Err(missing_context("define property", IN_CLASS));
        };
        let value = Property::try_from(self.eval(value)?)?;
        self.env.classes_mut().get_mut(class).set_property(name, value);
        Ok(Value::Nothing)
    }

    pub(super) fn eval_define_action(
        &mut self,
        name: &str,
        parameters: Option<&SharedNode>,
        body: &SharedNode,
        inherited: Inherited<'_>,
    ) -> EvalResult {
        let Inherited::ClassBeingDefined(class) = inherited else {
            return Err(missing_context("define action", IN_CLASS));
        };
        let mut definition = CustomActionDefinition::new(SharedNode::clone(body));
        if let Some(parameters) = parameters {
            self.eval_with(
                parameters,
                Inherited::ActionBeingDefined(&mut definition.parameters),
            )?;
        }
        tracing::debug!(
            class = self.env.classes().get(class).name(),
            action = name,
            parameters = definition.parameters.len(),
            "custom action defined"
        );
        self.env
            .classes_mut()
            .get_mut(class)
            .define_action(name, definition);
        Ok(Value::Nothing)
    }

    pub(super) fn eval_parameter_list(
        &mut self,
        items: &[SharedNode],
        inherited: Inherited<'_>,
    ) -> EvalResult {
        let Inherited::ActionBeingDefined(parameters) = inherited else {
            return Err(missing_context("parameter list", IN_ACTION));
        };
        for item in items {
            self.eval_with(item, Inherited::ActionBeingDefined(&mut *parameters))?;
        }
        Ok(Value::Nothing)
    }

    pub(super) fn eval_parameter(&mut self, name: &str, inherited: Inherited<'_>) -> EvalResult {
        let Inherited::ActionBeingDefined(parameters) = inherited else {
            return Err(missing_context("parameter", IN_ACTION));
        };
        parameters.push(name.to_string());
        Ok(Value::Nothing)
    }

    pub(super) fn eval_create_object(
        &mut self,
        name: &str,
        class: &str,
        properties: Option<&SharedNode>,
        position: &Node,
    ) -> EvalResult {
        let position = match self.eval(position)? {
            Value::Position(position) => position,
            other => return Err(invalid_type(ValueKind::Position, other.kind())),
        };
        let object = self.env.create_object(name, class, position)?;
        if let Some(properties) = properties {
            self.eval_with(properties, Inherited::ObjectBeingCreated(object))?;
        }
        Ok(Value::Nothing)
    }

    pub(super) fn eval_property_assign_list(
        &mut self,
        items: &[SharedNode],
        mut inherited: Inherited<'_>,
    ) -> EvalResult {
        if !matches!(
            inherited,
            Inherited::ObjectBeingCreated(_) | Inherited::PropertiesBeingQueued(_)
        ) {
            return Err(missing_context("property assignment list", IN_PROPERTY_LIST));
        }
        for item in items {
            self.eval_with(item, inherited.reborrow())?;
        }
        Ok(Value::Nothing)
    }

    pub(super) fn eval_property_assign(
        &mut self,
        name: &str,
        value: &Node,
        inherited: Inherited<'_>,
    ) -> EvalResult {
        let value = Property::try_from(self.eval(value)?)?;
        match inherited {
            Inherited::ObjectBeingCreated(object) => {
                self.env.object_mut(object)?.set_property(name, value);
            }
            Inherited::PropertiesBeingQueued(properties) => {
                properties.push((name.to_string(), value));
            }
            _ => return Err(missing_context("property assignment", IN_PROPERTY_LIST)),
        }
        Ok(Value::Nothing)
    }
}
