//! # Help Text
//!
//! Help message for bot commands.
//! Displayed to the user via the `.help` command.

pub const MAIN: &str = concat!(
    "**🦋 Skyrelay Help**\n",
    "Use: .command _args_\n",
    "\n",
    "**👥 Accounts**\n",
    "* follow [handle]: Start relaying an account 🔒\n",
    "* unfollow [handle]: Stop relaying an account 🔒\n",
    "* accounts: List monitored accounts\n",
    "\n",
    "**🔎 Filter**\n",
    "* keywords: Show keywords\n",
    "* keywords add [words]: Add keywords 🔒\n",
    "* keywords remove [words]: Remove keywords 🔒\n",
    "* keywords clear: Remove all keywords 🔒\n",
    "* mode [none|include|exclude]: Set filter mode 🔒\n",
    "* case [on|off]: Toggle case-sensitive matching 🔒\n",
    "\n",
    "**⚡ Misc**\n",
    "* status\n",
    "* help\n",
    "\n",
    "🔒 = admin only\n"
);
