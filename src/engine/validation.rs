use crate::domain::player::PlayerAtTable;
use crate::engine::actions::PlayerActionKind;
use crate::engine::betting::{legal_actions, BettingState};
use crate::engine::errors::EngineError;

/// Проверка действия против множества легальных. Вызывается ДО любой
/// мутации: отвергнутое действие не трогает состояние, ход не сгорает.
pub fn validate_action(
    player: &PlayerAtTable,
    action: &PlayerActionKind,
    betting: &BettingState,
) -> Result<(), EngineError> {
    let legal = legal_actions(player, betting);

    match action {
        PlayerActionKind::Fold => {
            if legal.can_fold {
                Ok(())
            } else {
                Err(EngineError::IllegalAction)
            }
        }

        PlayerActionKind::Check => {
            if !legal.can_fold {
                Err(EngineError::IllegalAction)
            } else if legal.can_check {
                Ok(())
            } else {
                Err(EngineError::CannotCheck)
            }
        }

        PlayerActionKind::Call => {
            if !legal.can_fold {
                Err(EngineError::IllegalAction)
            } else if legal.call_amount.is_some() {
                Ok(())
            } else {
                Err(EngineError::CannotCall)
            }
        }

        PlayerActionKind::Raise(total_bet) => {
            if !legal.can_fold {
                return Err(EngineError::IllegalAction);
            }
            let (min_total, max_total) = match legal.raise_totals {
                Some(range) => range,
                // Либо полный рейз не по стеку (остаётся all-in),
                // либо ре-рейз закрыт коротким олл-ином.
                None if legal.can_all_in => return Err(EngineError::NotEnoughChips),
                None => return Err(EngineError::IllegalAction),
            };
            if *total_bet > max_total {
                return Err(EngineError::NotEnoughChips);
            }
            if *total_bet < min_total {
                return Err(EngineError::RaiseTooSmall);
            }
            Ok(())
        }

        PlayerActionKind::AllIn => {
            if legal.can_all_in {
                Ok(())
            } else {
                Err(EngineError::IllegalAction)
            }
        }
    }
}
