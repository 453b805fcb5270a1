//! Prompt text for model-backed players.
//!
//! Every reply format is a set of `KEY: value` lines so that
//! [`crate::extract`] can read them back.

use crate::games::spyfall::{Player, PlayerSecret, Turn};

/// Roster names by seat index, used to render transcripts.
#[derive(Debug, Clone, Default)]
pub(crate) struct Roster {
    names: Vec<String>,
}

impl Roster {
    pub(crate) fn from_players(players: &[Player]) -> Self {
        Self {
            names: players.iter().map(|p| p.name().clone()).collect(),
        }
    }

    pub(crate) fn name(&self, index: usize) -> String {
        self.names
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("Player {}", index + 1))
    }

    pub(crate) fn others(&self, me: &Player) -> Vec<&str> {
        self.names
            .iter()
            .map(String::as_str)
            .filter(|n| *n != me.name().as_str())
            .collect()
    }
}

pub(crate) fn system_prompt(me: &Player, locations: &[String]) -> String {
    let identity = match me.secret() {
        PlayerSecret::Spy => format!(
            "You are the SPY. You do not know the location. Blend in, avoid \
             suspicion, and try to work out where everyone is. The location is \
             one of: {}.",
            locations.join(", ")
        ),
        PlayerSecret::Civilian { location, role } => format!(
            "The location is {location}. Your role there is {role}. One player \
             is a spy who does not know the location. Prove you belong without \
             giving the location away, and find the spy."
        ),
    };
    format!(
        "You are {name}, a player in the party game Spyfall. {identity} \
         Keep every spoken line to one or two sentences. Always reply using \
         exactly the KEY: value lines you are asked for.",
        name = me.name()
    )
}

pub(crate) fn transcript(roster: &Roster, turns: &[Turn]) -> String {
    if turns.is_empty() {
        return "No questions have been asked yet.".to_string();
    }
    turns
        .iter()
        .enumerate()
        .map(|(i, t)| {
            format!(
                "{}. {} asked {}: \"{}\"\n   {} answered: \"{}\"",
                i + 1,
                roster.name(t.asker_id().index()),
                roster.name(t.target_id().index()),
                t.question(),
                roster.name(t.target_id().index()),
                t.answer()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn choose_action(roster: &Roster, turns: &[Turn], me: &Player, can_accuse: bool) -> String {
    let mut options = vec!["question - ask someone a question"];
    if me.is_spy() {
        options.push("guess - reveal yourself and guess the location");
    }
    if can_accuse {
        options.push("vote - accuse someone of being the spy and call a vote");
    }
    let keywords: Vec<&str> = options
        .iter()
        .filter_map(|o| o.split(' ').next())
        .collect();
    format!(
        "Transcript so far:\n{}\n\nIt is your turn. Options:\n- {}\n\n\
         Reply with:\nTHOUGHT: <private reasoning>\nACTION: <{}>",
        transcript(roster, turns),
        options.join("\n- "),
        keywords.join("|"),
    )
}

pub(crate) fn ask(roster: &Roster, me: &Player) -> String {
    format!(
        "Pick another player and ask them a question. Players: {}.\n\n\
         Reply with:\nTHOUGHT: <private reasoning>\nTARGET: <player name>\nQUESTION: <your question>",
        roster.others(me).join(", ")
    )
}

pub(crate) fn answer(asker_name: &str, question: &str) -> String {
    format!(
        "{asker_name} asks you: \"{question}\"\n\nReply with:\nANSWER: <your answer>"
    )
}

pub(crate) fn accuse(roster: &Roster, turns: &[Turn], me: &Player) -> String {
    format!(
        "Transcript so far:\n{}\n\nYou are calling a vote. Who is the spy? Players: {}.\n\n\
         Reply with:\nTHOUGHT: <private reasoning>\nTARGET: <player name>\nREASON: <what you say to the table>",
        transcript(roster, turns),
        roster.others(me).join(", ")
    )
}

pub(crate) fn defend(roster: &Roster, accuser_name: &str, accusation: &str, turns: &[Turn]) -> String {
    format!(
        "Transcript so far:\n{}\n\n{accuser_name} accuses you of being the spy: \"{accusation}\"\n\n\
         Reply with:\nTHOUGHT: <private reasoning>\nDEFENSE: <what you say to the table>",
        transcript(roster, turns)
    )
}

pub(crate) fn vote_on_accusation(
    roster: &Roster,
    accuser_name: &str,
    accused_name: &str,
    defense: &str,
    turns: &[Turn],
) -> String {
    format!(
        "Transcript so far:\n{}\n\n{accuser_name} accused {accused_name} of being the spy.\n\
         {accused_name} defended: \"{defense}\"\n\nDo you vote to convict {accused_name}?\n\n\
         Reply with:\nVOTE: <yes|no>\nREASON: <one sentence>",
        transcript(roster, turns)
    )
}

pub(crate) fn vote(roster: &Roster, turns: &[Turn], me: &Player) -> String {
    format!(
        "Transcript so far:\n{}\n\nQuestioning is over. Vote for the player you believe is the spy. \
         Players: {}.\n\nReply with:\nTHOUGHT: <private reasoning>\nVOTE: <player name>",
        transcript(roster, turns),
        roster.others(me).join(", ")
    )
}

pub(crate) fn guess_location(roster: &Roster, turns: &[Turn], locations: &[String], when_caught: bool) -> String {
    let situation = if when_caught {
        "You have been caught. Name the location to steal the win."
    } else {
        "You have chosen to reveal yourself. Name the location."
    };
    format!(
        "Transcript so far:\n{}\n\n{situation} Possible locations: {}.\n\n\
         Reply with:\nTHOUGHT: <private reasoning>\nGUESS: <location>",
        transcript(roster, turns),
        locations.join(", ")
    )
}

pub(crate) fn react(event: &str, author_name: &str, content: &str) -> String {
    format!(
        "{author_name} just said ({event}): \"{content}\"\n\nReact briefly.\n\n\
         Reply with:\nEMOJI: <one emoji>\nREACTION: <a few words>\nSUSPICION: <player name you suspect, or none>"
    )
}
