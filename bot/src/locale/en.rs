use super::Strings;

pub const STRINGS: Strings = Strings {
    default_command: "roast",
    quit_words: &[],

    no_target: &[
        "https://media.tenor.com/CZoZV7amWI8AAAAC/roast-turkey-turkey.gif",
        "https://media.giphy.com/media/f6a97XAWuW5AA1cViz/giphy.gif",
        "https://media.giphy.com/media/ZvwTFklWHDTozWT5CW/giphy.gif",
        "https://media.giphy.com/media/JThXXdHrFAQ0LNsVka/giphy.gif",
        "https://media.tenor.com/XcUy7gyqpWgAAAAd/turkey-roast.gif",
        "https://media.tenor.com/X1bcAP-Vy_sAAAAC/roast-in-flame-boy.gif",
        "https://media.tenor.com/pp_7aPIRIwkAAAAC/hog-hog-roast.gif",
        "You're so stupid you even forgot to mention someone to roast, dumbass.",
        "Cooking up the perfect roast... Roast ready at <t:{ready_at}:f>",
        "Who do you want me to roast, dumbass. Next time tell me who to roast.",
    ],
    self_target: &[
        "Look in the mirror, there's my roast. Now next time give me someone else to roast",
        "Why do you even want to roast yourself?",
        "https://tenor.com/view/roast-turkey-turkey-thanksgiving-gif-18067752",
        "You have no friends, so lonely you're trying to roast yourself...",
        "Stop roasting yourself, there are so many roasts ready to use on others",
        "Cooking up the perfect roast... Roast ready at <t:{ready_at}:f>",
        "Don't tell me there are {others} other people to roast, and out of all of them you want to roast yourself??",
        "Are you okay? Do you need mental help? Why is your dumbass trying to roast yourself...",
    ],
    bot_target: &[
        "You really think I'm gonna roast myself? :joy:",
        "You're dumb as hell for thinking I would roast myself...",
        "Lol no",
        "Sike you thought. I'm not gonna roast myself, dumbass.",
        "I'm not gonna roast myself, so I'll roast you instead.\n",
        "Buddy, you really think you're that funny? I might just be a Discord bot, but I'm not gonna roast myself :joy::skull:",
        "I'm simply perfect, there's nothing to roast about me :angel:",
    ],

    confirm_label: "Confirm",
    cancel_label: "Cancel",
    stop_label: "Stop",

    battle_prompt: "We'll be taking turns trying to roast each other. Are you sure you can handle this and want to continue?",
    battle_accepted: "You accepted the roast battle. May the biggest chicken be the tastiest roast.",
    battle_cancelled: "You cancelled and chickened out of the roast battle.",
    not_your_battle: "This is not your roast battle.",

    battle_opening: "{mention} Alright, give me your best roast and we'll take turns.\nIf you want to stop, just click the button or send \"stop\" or \"quit\".",
    battle_forfeit: "{mention} you're so lame bro, chickening out like that. But I wouldn't want to hurt your few brain cells any further, bye.",
    battle_tired: "{mention} I'm too tired to keep talking right now, bye.",
    battle_limit: "That's enough roasting for now, I can already smell you starting to burn...",
    battle_too_long: "Too much to read. Send at most {limit} characters, no need to write a whole book about me!\nCome on, try again!",
    battle_stopped: "Boo, you're no fun.",
    battles_offline: "My roasting brain is offline right now, try roasting someone else instead.",

    cooldown: "You're on cooldown, try again in **`{retry_after}s`**",
    busy: "Slow down, there are already too many roast battles going on here.",

    persona_language: "English",
};
