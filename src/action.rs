use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::Direction;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    Init,
    Tick,

    TitleConfirm,
    HatchConfirm,

    Move(Direction),

    // Battle
    BattleMenuPrev,
    BattleMenuNext,
    BattleConfirm,

    ResultConfirm,

    // Pet scene
    PetToggle,
    PetPat,
    PetBonk,

    Quit,
}
