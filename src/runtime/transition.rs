use super::cmd::Cmd;

/// Result of `init` or `update`: a new model, optionally with a command to
/// run once the model is committed.
#[derive(Debug)]
pub enum Transition<M, Msg> {
    Model(M),
    WithCmd(M, Cmd<Msg>),
}

impl<M, Msg> Transition<M, Msg> {
    pub fn model(model: M) -> Self {
        Transition::Model(model)
    }

    pub fn with_cmd(model: M, cmd: Cmd<Msg>) -> Self {
        Transition::WithCmd(model, cmd)
    }

    pub fn has_cmd(&self) -> bool {
        matches!(self, Transition::WithCmd(..))
    }

    pub fn model_ref(&self) -> &M {
        match self {
            Transition::Model(model) | Transition::WithCmd(model, _) => model,
        }
    }

    pub fn into_parts(self) -> (M, Option<Cmd<Msg>>) {
        match self {
            Transition::Model(model) => (model, None),
            Transition::WithCmd(model, cmd) => (model, Some(cmd)),
        }
    }
}

impl<M, Msg> From<(M, Cmd<Msg>)> for Transition<M, Msg> {
    fn from((model, cmd): (M, Cmd<Msg>)) -> Self {
        Transition::WithCmd(model, cmd)
    }
}
