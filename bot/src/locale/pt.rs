use super::Strings;

pub const STRINGS: Strings = Strings {
    default_command: "ativar",
    quit_words: &["parar", "sair"],

    no_target: &[
        "https://media.tenor.com/CZoZV7amWI8AAAAC/roast-turkey-turkey.gif",
        "https://media.giphy.com/media/f6a97XAWuW5AA1cViz/giphy.gif",
        "https://media.giphy.com/media/ZvwTFklWHDTozWT5CW/giphy.gif",
        "https://media.giphy.com/media/JThXXdHrFAQ0LNsVka/giphy.gif",
        "https://media.tenor.com/XcUy7gyqpWgAAAAd/turkey-roast.gif",
        "https://media.tenor.com/X1bcAP-Vy_sAAAAC/roast-in-flame-boy.gif",
        "https://media.tenor.com/pp_7aPIRIwkAAAAC/hog-hog-roast.gif",
        "Você é tão burro que até esqueceu de mencionar alguém para assar, idiota.",
        "Preparando o assado perfeito... Assado pronto em <t:{ready_at}:f>",
        "Quem você quer assar, idiota. Da próxima vez, diga-me quem assar.",
    ],
    self_target: &[
        "Olhe no espelho, lá está o meu assado. Agora, da próxima vez, me dê outra pessoa para assar",
        "Por que você ainda quer se assar?",
        "https://tenor.com/view/roast-turkey-turkey-thanksgiving-gif-18067752",
        "Você não tem amigos, tão sozinho que está tentando se assar...",
        "Pare de se assar, há tantos assados prontos para usar nos outros",
        "Preparando o assado perfeito... Assado pronto em <t:{ready_at}:f>",
        "Não me diga que há {others} outras pessoas para assar, e de todas essas pessoas você quer assar você mesmo??",
        "Você está bem? Você precisa de ajuda mental? Por que seu idiota está tentando se assar...",
    ],
    bot_target: &[
        "Acha mesmo que vou me assar? :joy:",
        "Você é burro pra caramba por pensar que eu iria me assar...",
        "Lol não",
        "Sike você pensou. Eu não vou me assar, idiota.",
        "Eu não vou me assar, então vou assar você.\n",
        "Amigo, você realmente se acha tão engraçado? Posso ser apenas um bot do Discord, mas não vou me assar :joy::skull:",
        "Eu sou simplesmente perfeito, não há nada para assar sobre mim :angel:",
    ],

    confirm_label: "Confirmar",
    cancel_label: "Cancelar",
    stop_label: "Parar",

    battle_prompt: "Estaremos nos revezando tentando assar um ao outro. Tem certeza de que pode lidar com isso e deseja continuar?",
    battle_accepted: "Você aceitou a batalha do assado. Que o maior frango seja o assado mais gostoso.",
    battle_cancelled: "Você cancelou e se acovardou na batalha do assado.",
    not_your_battle: "Esta não é a sua batalha assado.",

    battle_opening: "{mention} Tudo bem, me dê seu melhor assado e nós revezaremos.\nSe quiser parar, basta clicar no botão ou enviar \"parar\" ou \"sair\".",
    battle_forfeit: "{mention} você é tão manco mano, se acovardando assim. Mas eu não gostaria de machucar muito mais suas poucas células cerebrais, tchau.",
    battle_tired: "{mention} Estou muito cansado para continuar falando agora, tchau.",
    battle_limit: "Já está assando o suficiente agora, eu já posso sentir o cheiro que você está começando a queimar...",
    battle_too_long: "Muito para ler. Envie no máximo {limit} caracteres, não há necessidade de escrever um livro inteiro sobre mim!\nVenha, tente novamente!",
    battle_stopped: "Boo, você não é divertido.",
    battles_offline: "Meu cérebro de assar está desligado agora, tente assar outra pessoa.",

    cooldown: "Você está em cooldown, tente novamente em **`{retry_after}s`**",
    busy: "Calma, já tem batalhas de assado demais acontecendo aqui.",

    persona_language: "Brazilian Portuguese",
};
