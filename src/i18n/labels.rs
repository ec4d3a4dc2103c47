//! Static labels and messages.

pub(super) fn lookup(key: &str, lang: &str) -> Option<&'static str> {
    let es = lang == "Spanish";
    let s = match key {
        "reminder_placeholder" => {
            if es {
                "Recordatorio"
            } else {
                "Reminder"
            }
        }
        "remind_usage" => {
            if es {
                "Dime cuándo y qué. Por ejemplo:\n/recordatorio mañana a las 9 llamar al médico"
            } else {
                "Tell me when and what. For example:\n/recordatorio mañana a las 9 llamar al médico"
            }
        }
        "date_not_understood" => {
            if es {
                "No entendí la fecha 🤔 Prueba con algo como \"mañana a las 9\", \"el viernes\" o \"en 10 minutos\"."
            } else {
                "I couldn't understand the date 🤔 Try something like \"mañana a las 9\", \"el viernes\" or \"en 10 minutos\"."
            }
        }
        "not_armed" => {
            if es {
                "⚠️ Esa hora ya pasó, así que no podré avisarte. Bórralo y créalo con una hora futura."
            } else {
                "⚠️ That time has already passed, so I can't notify you. Delete it and set a future time."
            }
        }
        "no_pending" => {
            if es {
                "No tienes recordatorios pendientes."
            } else {
                "You have no pending reminders."
            }
        }
        "pending_header" => {
            if es {
                "📋 Tus recordatorios:"
            } else {
                "📋 Your reminders:"
            }
        }
        "delete_usage" => {
            if es {
                "Dime qué borrar. Por ejemplo: /borrar médico"
            } else {
                "Tell me what to delete. For example: /borrar médico"
            }
        }
        "nothing_found" => {
            if es {
                "No encontré recordatorios con ese texto."
            } else {
                "I found no reminders with that text."
            }
        }
        "storage_error" => {
            if es {
                "Uy, algo falló al guardar. Inténtalo de nuevo en un momento."
            } else {
                "Oops, something went wrong while saving. Please try again in a moment."
            }
        }
        "restart_notice" => {
            if es {
                "🔄 ¡Ya estoy de vuelta! Tus recordatorios siguen activos."
            } else {
                "🔄 I'm back! Your reminders are still active."
            }
        }
        "help_commands" => {
            if es {
                "/recordatorio <cuándo> <qué> — crear un recordatorio\n\
                 /misrecordatorios — ver los pendientes\n\
                 /borrar <texto> — borrar los que contengan ese texto\n\
                 También puedes escribir \"borra <texto>\" o \"elimina <texto>\"."
            } else {
                "/recordatorio <when> <what> — create a reminder\n\
                 /misrecordatorios — list pending ones\n\
                 /borrar <text> — delete those containing that text\n\
                 You can also write \"borra <text>\" or \"elimina <text>\"."
            }
        }
        _ => return None,
    };
    Some(s)
}
